//! Integration tests for notifier emission, unsubscription and once-reads.

use observer_lite::prelude::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_test::{assert_pending, assert_ready, task};

#[test]
fn test_next_invokes_subscriber_and_memoizes() {
    let notifier = Notifier::new();
    let received = Arc::new(Mutex::new(Vec::new()));

    let received_clone = Arc::clone(&received);
    notifier.subscribe(move |value: &i32| received_clone.lock().push(*value));

    notifier.next(5).unwrap();

    assert_eq!(*received.lock(), vec![5]);
    assert_eq!(*notifier.once_value().unwrap(), OnceValue::Value(5));
}

#[test]
fn test_unsubscribed_callback_is_not_invoked() {
    let notifier = Notifier::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = Arc::clone(&calls);
    let handle = notifier.subscribe(move |_: &i32| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });
    notifier.unsubscribe(&handle);
    notifier.next(1).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_once_then_empty_emission_resolves_true() {
    let notifier: Notifier<()> = Notifier::new();
    let mut once = task::spawn(notifier.once());
    assert_pending!(once.poll());

    notifier.next(()).unwrap();

    let value = assert_ready!(once.poll()).unwrap();
    assert_eq!(value, OnceValue::Flag);
}

#[test]
fn test_double_unsubscribe_is_noop() {
    let notifier: Notifier<i32> = Notifier::new();
    let keep = notifier.subscribe(|_| {});
    let drop_me = notifier.subscribe(|_| {});

    assert!(notifier.unsubscribe(&drop_me));
    assert!(!notifier.unsubscribe(&drop_me));
    assert_eq!(notifier.subscriber_count(), 1);
    assert!(notifier.unsubscribe(&keep));
}

#[test]
fn test_reset_once_behaves_like_fresh() {
    let notifier = Notifier::new();
    notifier.next("old".to_string()).unwrap();
    notifier.unsubscribe_all(true);

    let mut once = task::spawn(notifier.once());
    assert_pending!(once.poll());

    notifier.next("new".to_string()).unwrap();
    let value = assert_ready!(once.poll()).unwrap();
    assert_eq!(value.into_value().as_deref(), Some("new"));
}

#[test]
fn test_failing_callback_aborts_remaining_callbacks() {
    let notifier: Notifier<&'static str> = Notifier::new();
    let ran = Arc::new(Mutex::new(Vec::new()));

    let ran_first = Arc::clone(&ran);
    notifier.subscribe(move |_| ran_first.lock().push("first"));
    notifier.try_subscribe(|payload| Err(format!("rejected {payload}").into()));
    let ran_last = Arc::clone(&ran);
    notifier.subscribe(move |_| ran_last.lock().push("last"));

    let err = notifier.next("event").unwrap_err();
    assert_eq!(err.to_string(), "Subscriber #2 failed: rejected event");
    assert_eq!(*ran.lock(), vec!["first"]);
}

#[tokio::test]
async fn test_once_awaited_from_another_task() {
    let notifier: Notifier<u64> = Notifier::new();
    let waiter = {
        let notifier = notifier.clone();
        tokio::spawn(async move { notifier.once().await })
    };

    // Let the waiter register before emitting.
    while notifier.subscriber_count() == 0 {
        tokio::task::yield_now().await;
    }
    notifier.next(42).unwrap();

    let value = waiter.await.unwrap().unwrap();
    assert_eq!(value, OnceValue::Value(42));
}

#[test]
fn test_tuple_payload_uses_first_element_for_once() {
    let notifier: Notifier<(u8, &'static str)> = Notifier::new();
    notifier.next((0, "ignored")).unwrap();
    assert!(notifier.once_value().unwrap().is_flag());

    let other: Notifier<(u8, &'static str)> = Notifier::new();
    other.next((3, "kept")).unwrap();
    assert_eq!(*other.once_value().unwrap(), OnceValue::Value((3, "kept")));
}

#[test]
fn test_json_payloads() {
    let notifier: Notifier<serde_json::Value> = Notifier::new();
    notifier.next(serde_json::Value::Null).unwrap();
    assert!(notifier.once_value().unwrap().is_flag());
}

#[derive(Debug, Clone)]
enum Op {
    Subscribe,
    Unsubscribe(usize),
    Next(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Subscribe),
        2 => (0usize..16).prop_map(Op::Unsubscribe),
        3 => any::<i32>().prop_map(Op::Next),
    ]
}

proptest! {
    #[test]
    fn prop_next_reaches_exactly_live_subscribers(
        ops in prop::collection::vec(op_strategy(), 1..60)
    ) {
        let notifier: Notifier<i32> = Notifier::new();
        let log: Arc<Mutex<Vec<(usize, i32)>>> = Arc::new(Mutex::new(Vec::new()));

        // Model: live subscriptions in subscription order, tagged by label.
        let mut live: Vec<(usize, Subscription)> = Vec::new();
        let mut issued: Vec<Subscription> = Vec::new();
        let mut first: Option<i32> = None;

        for op in ops {
            match op {
                Op::Subscribe => {
                    let label = issued.len();
                    let log = Arc::clone(&log);
                    let handle = notifier.subscribe(move |v| log.lock().push((label, *v)));
                    issued.push(handle);
                    live.push((label, handle));
                }
                Op::Unsubscribe(index) => {
                    if let Some(handle) = issued.get(index).copied() {
                        let was_live = live.iter().any(|(_, h)| *h == handle);
                        prop_assert_eq!(notifier.unsubscribe(&handle), was_live);
                        live.retain(|(_, h)| *h != handle);
                    }
                }
                Op::Next(value) => {
                    first.get_or_insert(value);
                    log.lock().clear();
                    notifier.next(value).unwrap();

                    let expected: Vec<(usize, i32)> =
                        live.iter().map(|(label, _)| (*label, value)).collect();
                    prop_assert_eq!(&*log.lock(), &expected);
                }
            }
            prop_assert_eq!(notifier.subscriber_count(), live.len());
        }

        match first {
            Some(value) => {
                let once = notifier.once_value().unwrap();
                prop_assert_eq!(&*once, &OnceValue::coalesce(&value));
            }
            None => prop_assert!(notifier.once_value().is_none()),
        }
    }
}
