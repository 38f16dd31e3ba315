//! Process-wide registries, one per payload type.

use crate::registry::Registry;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Registries created so far, keyed by payload type. Never torn down.
static GLOBAL_REGISTRIES: LazyLock<Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

impl<T: Send + Sync + 'static> Registry<T> {
    /// The process-wide registry for notifiers of `T`.
    ///
    /// Created lazily on first use and shared by every caller in the
    /// process. Prefer passing an explicit [`Registry`] where practical.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use observer_lite::prelude::*;
    ///
    /// let settings = NotifierSettings::new().with_key("session");
    /// let a = Registry::<String>::global().get_or_create(settings.clone());
    /// let b = Registry::<String>::global().get_or_create(settings);
    /// assert!(Notifier::ptr_eq(&a, &b));
    /// ```
    pub fn global() -> Registry<T> {
        let mut registries = GLOBAL_REGISTRIES.lock();
        let slot = registries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(Registry::<T>::new()));

        slot.downcast_ref::<Registry<T>>()
            .expect("global registry slot keyed by TypeId holds a Registry of that type")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Notifier, NotifierSettings};

    #[derive(Clone)]
    struct GlobalOnlyPayload;

    #[test]
    fn test_global_is_shared() {
        let a = Registry::<GlobalOnlyPayload>::global();
        let b = Registry::<GlobalOnlyPayload>::global();

        let created = a.get_or_create(NotifierSettings::new().with_key("global-shared"));
        let found = b.get("global-shared").unwrap();
        assert!(Notifier::ptr_eq(&created, &found));
    }

    #[test]
    fn test_global_is_per_type() {
        Registry::<u16>::global().get_or_create(NotifierSettings::new().with_key("per-type"));
        assert!(!Registry::<i16>::global().contains("per-type"));
        assert!(Registry::<u16>::global().contains("per-type"));
    }
}
