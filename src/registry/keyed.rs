//! Keyed notifier store with get-or-create semantics.

use crate::core::{Notifier, NotifierSettings};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A store of singleton notifiers, one per key.
///
/// The application creates a registry and passes it to whoever constructs
/// notifiers. [`get_or_create`](Self::get_or_create) runs the lookup and the
/// insert under a single lock, so concurrent callers with the same key all
/// receive the same notifier.
///
/// Cloning a registry yields another handle to the same store.
///
/// # Examples
///
/// ```rust
/// use observer_lite::prelude::*;
///
/// let registry: Registry<u32> = Registry::new();
///
/// let a = registry.get_or_create(NotifierSettings::new().with_key("jobs"));
/// let b = registry.get_or_create(NotifierSettings::new().with_key("jobs"));
/// assert!(Notifier::ptr_eq(&a, &b));
///
/// let private = registry.get_or_create(NotifierSettings::new());
/// assert!(!Notifier::ptr_eq(&a, &private));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct Registry<T> {
    slots: Arc<Mutex<HashMap<String, Notifier<T>>>>,
}

impl<T: Send + Sync + 'static> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the notifier registered under `settings.key`, creating and
    /// registering it if the key is new.
    ///
    /// When the key is already taken the given settings are discarded and the
    /// existing notifier keeps its original ones. Settings without a key (or
    /// with an empty key) produce a fresh notifier that is not registered.
    pub fn get_or_create(&self, settings: NotifierSettings) -> Notifier<T> {
        let key = match settings.key() {
            Some(key) if !key.is_empty() => key.to_owned(),
            _ => return Notifier::with_settings(settings),
        };

        let mut slots = self.slots.lock();
        match slots.entry(key) {
            Entry::Occupied(slot) => {
                debug!(
                    key = %slot.key(),
                    notifier = %slot.get().id(),
                    "reusing registered notifier"
                );
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                let notifier = Notifier::with_settings(settings);
                debug!(key = %slot.key(), notifier = %notifier.id(), "registered notifier");
                slot.insert(notifier.clone());
                notifier
            }
        }
    }

    /// Look up a registered notifier without creating one.
    pub fn get(&self, key: &str) -> Option<Notifier<T>> {
        self.slots.lock().get(key).cloned()
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }

    /// Unregister `key`, returning its notifier.
    ///
    /// Existing handles keep working; the next `get_or_create` for the key
    /// creates a new notifier.
    pub fn remove(&self, key: &str) -> Option<Notifier<T>> {
        let removed = self.slots.lock().remove(key);
        if removed.is_some() {
            debug!(key, "unregistered notifier");
        }
        removed
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.slots.lock().keys().cloned().collect()
    }

    /// Number of registered notifiers.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether no notifier is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Unregister every notifier.
    pub fn clear(&self) {
        let drained: Vec<_> = self.slots.lock().drain().collect();
        debug!(count = drained.len(), "cleared registry");
    }
}

impl<T: Send + Sync + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.slots.lock().len())
            .finish()
    }
}
