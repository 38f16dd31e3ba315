//! Singleton-by-key notifier registries.
//!
//! [`Registry`] is an explicit store the application owns and passes
//! around. With the `global-registry` feature, `Registry::<T>::global()`
//! also provides a lazily created process-wide instance per payload type.

mod keyed;

#[cfg(feature = "global-registry")]
mod global;

pub use keyed::Registry;
