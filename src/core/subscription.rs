//! Identifiers and handles for notifiers and their subscriptions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NOTIFIER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotifierId(u64);

impl NotifierId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NOTIFIER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, for logs and debugging output.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notifier-{}", self.0)
    }
}

/// Identity of a subscription, unique within its notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value, for logs and debugging output.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability token returned by `subscribe`.
///
/// Pass it back to [`Notifier::unsubscribe`](crate::core::Notifier::unsubscribe)
/// to remove the callback. Dropping the handle does not unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: SubscriptionId,
    notifier: NotifierId,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, notifier: NotifierId) -> Self {
        Self { id, notifier }
    }

    /// The subscription's id within its notifier.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The notifier that issued this handle.
    pub fn notifier(&self) -> NotifierId {
        self.notifier
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.notifier, self.id)
    }
}
