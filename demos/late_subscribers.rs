//! Example demonstrating keyed notifiers and late once-reads.
//!
//! This example shows how to:
//! - Share one notifier between components through a registry key
//! - Broadcast to subscribers in order
//! - Read the first emitted value after the fact
//! - Tear everything down with `unsubscribe_all`
//!
//! Run with: cargo run --example late_subscribers

use observer_lite::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct Ready {
    version: &'static str,
}

impl Truthy for Ready {
    fn is_truthy(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Late Subscribers Example ===\n");

    let registry: Registry<Ready> = Registry::new();

    // Two components ask for the same channel by key.
    let loader = registry.get_or_create(NotifierSettings::new().with_key("ready"));
    let ui = registry.get_or_create(NotifierSettings::new().with_key("ready"));
    println!("Same notifier: {}", Notifier::ptr_eq(&loader, &ui));

    let notifications = Arc::new(AtomicUsize::new(0));
    let notifications_clone = Arc::clone(&notifications);
    let subscription = ui.subscribe(move |ready| {
        let count = notifications_clone.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[UI] ready v{} (notification #{})", ready.version, count);
    });

    // A waiter registered before anything was emitted.
    let early = ui.once();

    loader.next(Ready { version: "1.0" })?;
    loader.next(Ready { version: "1.1" })?;

    let early = early.await?;
    println!("Early waiter saw: {:?}", early.value());

    // A reader arriving after the fact gets the first value immediately.
    let late = registry.get("ready").map(|n| n.once());
    if let Some(late) = late {
        println!("Late reader saw: {:?}", late.await?.value());
    }

    ui.unsubscribe(&subscription);
    loader.unsubscribe_all(true);
    println!(
        "\nSubscribers left: {}, once-value cleared: {}",
        loader.subscriber_count(),
        loader.once_value().is_none()
    );

    Ok(())
}
