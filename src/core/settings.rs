//! Construction settings for a notifier.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings a notifier is constructed with.
///
/// Only `key` is interpreted, and only by a [`Registry`](crate::registry::Registry):
/// it names the singleton slot the notifier lives in. Every other field is
/// kept verbatim in [`extra`](Self::extra) for the application's own use.
///
/// # Examples
///
/// ```rust
/// use observer_lite::core::NotifierSettings;
///
/// let settings = NotifierSettings::from_json(r#"{"key": "auth", "label": "Auth events"}"#)?;
/// assert_eq!(settings.key(), Some("auth"));
/// assert_eq!(settings.extra()["label"], "Auth events");
/// # Ok::<(), observer_lite::error::NotifierError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifierSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl NotifierSettings {
    /// Empty settings: no key, no extra fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the singleton key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach an uninterpreted setting.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Parse settings from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::InvalidSettings`](crate::error::NotifierError::InvalidSettings)
    /// if the input is not a JSON object or `key` is not a string.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// The singleton key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// All settings other than `key`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifierError;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let settings = NotifierSettings::new()
            .with_key("x")
            .with_extra("retries", 3)
            .with_extra("label", "X");

        assert_eq!(settings.key(), Some("x"));
        assert_eq!(settings.extra().len(), 2);
        assert_eq!(settings.extra()["retries"], json!(3));
    }

    #[test]
    fn test_from_json_keeps_unknown_fields() {
        let input = r#"{"key":"k","nested":{"a":[1,2]},"flag":false}"#;
        let settings = NotifierSettings::from_json(input).unwrap();
        assert_eq!(settings.key(), Some("k"));
        assert_eq!(settings.extra()["nested"], json!({"a": [1, 2]}));
        assert_eq!(settings.extra()["flag"], json!(false));
    }

    #[test]
    fn test_from_json_without_key() {
        let settings = NotifierSettings::from_json("{}").unwrap();
        assert_eq!(settings.key(), None);
        assert!(settings.extra().is_empty());
    }

    #[test]
    fn test_from_json_rejects_bad_key() {
        let err = NotifierSettings::from_json(r#"{"key": 12}"#).unwrap_err();
        assert!(matches!(err, NotifierError::InvalidSettings(_)));
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let settings = NotifierSettings::new().with_extra("a", 1);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}
