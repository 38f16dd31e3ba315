//! Error types for observer-lite.

use crate::core::SubscriptionId;

/// Result type alias for observer-lite operations.
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Boxed error returned by fallible subscriber callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when emitting to or reading from a notifier.
///
/// Invalid or stale subscription handles are not errors: `unsubscribe`
/// reports them through a `tracing` warning and returns `false`.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// A subscriber callback failed during an emission.
    ///
    /// Callbacks subscribed after the failing one did not run in that pass.
    #[error("Subscriber {subscription} failed: {source}")]
    CallbackFailed {
        /// The subscription whose callback failed
        subscription: SubscriptionId,
        /// The error returned by the callback
        #[source]
        source: BoxError,
    },

    /// The listener behind a pending `once()` was removed before any emission.
    #[error("Once listener was removed before a value was emitted")]
    OnceCancelled,

    /// Notifier settings could not be parsed.
    #[error("Invalid notifier settings: {0}")]
    InvalidSettings(String),
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::InvalidSettings(err.to_string())
    }
}
