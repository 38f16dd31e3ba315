//! The notifier: ordered subscribers, broadcast, and a memoized first value.

use crate::core::once::{OnceFuture, OnceValue, Truthy};
use crate::core::settings::NotifierSettings;
use crate::core::subscription::{NotifierId, Subscription, SubscriptionId};
use crate::error::{BoxError, NotifierError, Result};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Type alias for stored subscriber callbacks.
type Callback<T> = Arc<dyn Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync>;

struct Entry<T> {
    id: SubscriptionId,
    callback: Callback<T>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Internal subscriber list state.
struct Subscribers<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Subscribers<T> {
    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

struct Inner<T> {
    id: NotifierId,
    settings: NotifierSettings,
    subscribers: Mutex<Subscribers<T>>,
    /// Written only while `subscribers` is locked; read without locking.
    once_value: ArcSwapOption<OnceValue<T>>,
}

impl<T> Inner<T> {
    fn remove(&self, subscription: &Subscription) -> bool {
        if subscription.notifier() != self.id {
            warn!(
                notifier = %self.id,
                subscription = %subscription,
                "Invalid subscription passed to unsubscribe: issued by another notifier"
            );
            return false;
        }

        // The entry is dropped after the lock is released.
        let removed = {
            let mut subs = self.subscribers.lock();
            let position = subs
                .entries
                .iter()
                .position(|entry| entry.id == subscription.id());
            position.map(|index| subs.entries.remove(index))
        };

        match removed {
            Some(_entry) => {
                debug!(notifier = %self.id, subscription = %subscription.id(), "unsubscribed");
                true
            }
            None => {
                warn!(
                    notifier = %self.id,
                    subscription = %subscription.id(),
                    "Subscription not found, cannot unsubscribe"
                );
                false
            }
        }
    }

    fn store_once(&self, value: OnceValue<T>) {
        let _subs = self.subscribers.lock();
        self.once_value.store(Some(Arc::new(value)));
    }
}

/// An observable channel of `T` values.
///
/// Subscribers are invoked in subscription order on every [`next`](Self::next).
/// The first emission is also memoized as the *once-value*, which
/// [`once`](Self::once) hands to late readers.
///
/// `Notifier` is a cheap handle: clones share the same subscribers and
/// once-value.
///
/// # Examples
///
/// ```rust
/// use observer_lite::prelude::*;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicI32, Ordering};
///
/// # fn main() -> Result<()> {
/// let notifier = Notifier::new();
/// let seen = Arc::new(AtomicI32::new(0));
///
/// let seen_clone = Arc::clone(&seen);
/// let subscription = notifier.subscribe(move |value: &i32| {
///     seen_clone.store(*value, Ordering::SeqCst);
/// });
///
/// notifier.next(5)?;
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// assert_eq!(*notifier.once_value().unwrap(), OnceValue::Value(5));
///
/// notifier.unsubscribe(&subscription);
/// # Ok(())
/// # }
/// ```
pub struct Notifier<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + Sync + 'static> Notifier<T> {
    /// Create a fresh notifier with default settings.
    ///
    /// The notifier is private to its creator. Use a
    /// [`Registry`](crate::registry::Registry) for keyed singletons.
    pub fn new() -> Self {
        Self::with_settings(NotifierSettings::default())
    }

    /// Create a fresh notifier that keeps `settings` for later reference.
    ///
    /// The settings' `key` is not looked up here; this always creates a new
    /// instance.
    pub fn with_settings(settings: NotifierSettings) -> Self {
        let id = NotifierId::next();
        debug!(notifier = %id, key = ?settings.key(), "notifier created");
        Self {
            inner: Arc::new(Inner {
                id,
                settings,
                subscribers: Mutex::new(Subscribers {
                    entries: Vec::new(),
                    next_id: 1,
                }),
                once_value: ArcSwapOption::empty(),
            }),
        }
    }

    /// Subscribe a callback to every future emission.
    ///
    /// The same closure may be subscribed more than once; each subscription
    /// fires independently. Keep the returned handle to unsubscribe later.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.try_subscribe(move |payload| {
            callback(payload);
            Ok(())
        })
    }

    /// Subscribe a fallible callback.
    ///
    /// An `Err` returned by the callback aborts the emission pass it occurs
    /// in and is handed to the caller of [`next`](Self::next).
    pub fn try_subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        let mut subs = self.inner.subscribers.lock();
        let id = subs.allocate_id();
        subs.entries.push(Entry {
            id,
            callback: Arc::new(callback),
        });
        debug!(notifier = %self.inner.id, subscription = %id, "subscribed");
        Subscription::new(id, self.inner.id)
    }

    /// Remove a subscription.
    ///
    /// Returns `true` if it was removed. A handle from another notifier, or
    /// one that was already removed, is logged as a warning and ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.inner.remove(subscription)
    }

    /// Remove every current subscription.
    ///
    /// With `reset_once`, the once-value is cleared as well so that a later
    /// [`once`](Self::once) waits for a fresh emission. Pending `once`
    /// futures resolve to [`NotifierError::OnceCancelled`].
    pub fn unsubscribe_all(&self, reset_once: bool) {
        let handles: Vec<Subscription> = {
            let subs = self.inner.subscribers.lock();
            subs.entries
                .iter()
                .map(|entry| Subscription::new(entry.id, self.inner.id))
                .collect()
        };

        for handle in &handles {
            self.inner.remove(handle);
        }

        if reset_once {
            let _subs = self.inner.subscribers.lock();
            self.inner.once_value.store(None);
        }
        debug!(notifier = %self.inner.id, removed = handles.len(), reset_once, "unsubscribed all");
    }

    /// Emit `payload` to every current subscriber, in subscription order.
    ///
    /// The first emission is memoized as the once-value (falsy payloads as
    /// [`OnceValue::Flag`]). Subscribers added or removed by a callback do
    /// not affect the pass in progress.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::CallbackFailed`] for the first callback that
    /// fails; callbacks after it are not invoked in this pass. Panics in a
    /// callback are not caught either.
    pub fn next(&self, payload: T) -> Result<()>
    where
        T: Truthy + Clone,
    {
        let snapshot = {
            let subs = self.inner.subscribers.lock();
            if self.inner.once_value.load().is_none() {
                self.inner
                    .once_value
                    .store(Some(Arc::new(OnceValue::coalesce(&payload))));
            }
            subs.entries.clone()
        };

        trace!(notifier = %self.inner.id, subscribers = snapshot.len(), "emitting");

        for entry in &snapshot {
            (entry.callback)(&payload).map_err(|source| NotifierError::CallbackFailed {
                subscription: entry.id,
                source,
            })?;
        }
        Ok(())
    }

    /// Seed the once-value without notifying anyone.
    ///
    /// Overwrites any existing once-value.
    pub fn set_once(&self, payload: T)
    where
        T: Truthy,
    {
        let _subs = self.inner.subscribers.lock();
        self.inner
            .once_value
            .store(Some(Arc::new(OnceValue::from_payload(payload))));
    }

    /// Seed the once-value with [`OnceValue::Flag`].
    pub fn set_once_flag(&self) {
        let _subs = self.inner.subscribers.lock();
        self.inner.once_value.store(Some(Arc::new(OnceValue::Flag)));
    }

    /// Read the once-value asynchronously.
    ///
    /// If a value is already memoized the returned future is ready at once
    /// and no subscription is made. Otherwise a one-shot listener is
    /// subscribed now; on the next emission it stores that value as the
    /// once-value, resolves the future with it and unsubscribes itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use observer_lite::prelude::*;
    ///
    /// # async fn example() -> Result<()> {
    /// let ready: Notifier<()> = Notifier::new();
    /// let pending = ready.once();
    ///
    /// ready.next(())?;
    /// assert!(pending.await?.is_flag());
    /// # Ok(())
    /// # }
    /// ```
    pub fn once(&self) -> OnceFuture<T>
    where
        T: Truthy + Clone,
    {
        let mut subs = self.inner.subscribers.lock();
        if let Some(value) = self.inner.once_value.load_full() {
            return OnceFuture::ready((*value).clone());
        }

        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let id = subs.allocate_id();
        let handle = Subscription::new(id, self.inner.id);
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);

        let callback: Callback<T> =
            Arc::new(move |payload: &T| -> std::result::Result<(), BoxError> {
                let Some(tx) = tx.lock().take() else {
                    return Ok(());
                };
                let value = OnceValue::coalesce(payload);
                if let Some(inner) = weak.upgrade() {
                    inner.store_once(value.clone());
                    inner.remove(&handle);
                }
                // The receiver may already be gone; nothing to deliver then.
                let _ = tx.send(value);
                Ok(())
            });

        subs.entries.push(Entry { id, callback });
        debug!(notifier = %self.inner.id, subscription = %id, "once listener registered");
        OnceFuture::waiting(rx)
    }
}

impl<T> Notifier<T> {
    /// This notifier's process-unique id.
    pub fn id(&self) -> NotifierId {
        self.inner.id
    }

    /// The settings this notifier was constructed with.
    pub fn settings(&self) -> &NotifierSettings {
        &self.inner.settings
    }

    /// The memoized once-value, if set. Lock-free.
    pub fn once_value(&self) -> Option<Arc<OnceValue<T>>> {
        self.inner.once_value.load_full()
    }

    /// Number of current subscriptions, including pending `once` listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().entries.len()
    }

    /// Whether two handles refer to the same notifier.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T: Send + Sync + 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("id", &self.inner.id)
            .field("key", &self.inner.settings.key())
            .field("subscribers", &self.subscriber_count())
            .field("once_set", &self.inner.once_value.load().is_some())
            .finish()
    }
}
