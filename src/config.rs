//! # Opaque configuration source handed to `init`.
//!
//! [`Config`] is a flat string-keyed store. The runner threads it into every
//! [`Initializer::init`](crate::Initializer::init) call and never reads it
//! itself; units fetch the settings they care about with the typed getters.
//!
//! ## Sentinel values
//! - A missing key is `Ok(None)` from the typed getters, not an error.
//! - An unparseable value is a [`ProcessError::Config`] so a unit can fail
//!   its `init` with the offending key in the message.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ProcessError;

/// Flat key/value configuration passed to every `init`.
///
/// The runner treats it as opaque; units own the key space.
#[derive(Clone, Debug, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Fetches an unsigned integer value.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ProcessError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ProcessError::Config(format!("`{key}` is not an integer: `{raw}`"))),
        }
    }

    /// Fetches a duration value expressed as integer milliseconds.
    pub fn get_duration_ms(&self, key: &str) -> Result<Option<Duration>, ProcessError> {
        Ok(self.get_u64(key)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let cfg = Config::new();
        assert_eq!(cfg.get("absent"), None);
        assert_eq!(cfg.get_u64("absent").unwrap(), None);
    }

    #[test]
    fn typed_getters_parse() {
        let mut cfg = Config::new();
        cfg.set("retries", "3").set("tick", "250");

        assert_eq!(cfg.get_u64("retries").unwrap(), Some(3));
        assert_eq!(
            cfg.get_duration_ms("tick").unwrap(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn bad_value_names_the_key() {
        let mut cfg = Config::new();
        cfg.set("tick", "soon");

        let err = cfg.get_duration_ms("tick").unwrap_err();
        assert_eq!(err.as_label(), "process_bad_config");
        assert!(err.to_string().contains("`tick`"));
    }
}
