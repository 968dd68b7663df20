//! Free-form advanced parameters.
//!
//! Written as `key:value` entries separated by `;`, for example
//! `"target_armor:20000; Foo : Bar"`. Keys and values are trimmed and
//! lower-cased. Parsing stops after [`MAX_ADV_PARAMS`] accepted entries; the
//! rest of the string is ignored whether or not it is well formed.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use super::error::ConfigError;

/// Maximum number of accepted entries.
pub const MAX_ADV_PARAMS: usize = 8;

/// Validated, size-capped key/value extension of the settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AdvancedParams {
    entries: BTreeMap<String, String>,
}

impl AdvancedParams {
    /// Parse the `;`/`:` mini-language.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedAdvParam`] for a non-empty entry
    /// without a `:` separator, if it is reached before the cap.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        let mut accepted = 0;
        for entry in text.split(';') {
            if accepted >= MAX_ADV_PARAMS {
                break;
            }
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.split(':');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().ok_or_else(|| ConfigError::MalformedAdvParam {
                entry: entry.to_string(),
            })?;
            entries.insert(key.trim().to_lowercase(), value.trim().to_lowercase());
            accepted += 1;
        }
        Ok(Self { entries })
    }

    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromStr for AdvancedParams {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
