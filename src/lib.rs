//! # observer-lite
//!
//! A minimal observable: ordered subscriber callbacks, broadcast emission and
//! a memoized first value for late readers.
//!
//! ## Overview
//!
//! - [`Notifier`](core::Notifier) holds subscribers and invokes them in
//!   subscription order on every `next`.
//! - The first emission is remembered as the *once-value*;
//!   [`Notifier::once`](core::Notifier::once) returns a future that resolves
//!   with it, now or on the next emission.
//! - [`Registry`](registry::Registry) hands out one notifier per key, so
//!   independent parts of an application can share a channel by name.
//!
//! ## Quick Start
//!
//! ```rust
//! use observer_lite::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let registry: Registry<String> = Registry::new();
//! let auth = registry.get_or_create(NotifierSettings::new().with_key("auth"));
//!
//! let subscription = auth.subscribe(|user| println!("signed in: {user}"));
//!
//! // Elsewhere, the same key yields the same notifier.
//! let same = registry.get_or_create(NotifierSettings::new().with_key("auth"));
//! same.next("ada".to_string())?;
//!
//! // Late readers still see the first value.
//! let first = auth.once().await?;
//! assert_eq!(first.value().map(String::as_str), Some("ada"));
//!
//! auth.unsubscribe(&subscription);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `global-registry` (default): `Registry::<T>::global()`, a lazily
//!   created process-wide registry per payload type.
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`]. Unsubscribing with a stale or foreign
//! handle is reported at `warn` level; lifecycle events at `debug`.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod registry;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        Notifier, NotifierSettings, OnceFuture, OnceValue, Subscription, Truthy,
    };
    pub use crate::error::{NotifierError, Result};
    pub use crate::registry::Registry;
}
