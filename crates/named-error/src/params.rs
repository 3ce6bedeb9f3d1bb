// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only, string-keyed parameter store consumed by message producers.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::exceptional::ExceptionalError;

/// Key/value data supplied by the caller when raising a named error.
///
/// Values are stored as [`serde_json::Value`]. Once handed to a
/// [`NamedError`](crate::NamedError) the store is only reachable through
/// shared references, so it cannot change after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageParams {
    entries: BTreeMap<String, Value>,
}

impl MessageParams {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// A value that cannot be converted via [`serde_json::to_value`] is kept
    /// as `null`, so the key still [exists](Self::exists) but is not
    /// [defined](Self::is_defined).
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.entries.insert(key.into(), value);
        self
    }

    /// Value stored at `key`.
    pub fn get(&self, key: &str) -> Result<&Value, ExceptionalError> {
        self.entries
            .get(key)
            .ok_or_else(|| ExceptionalError::MissingParam {
                key: key.to_string(),
            })
    }

    /// Values for several keys, in the order they were requested.
    ///
    /// Fails on the first key that is not present.
    pub fn get_many<'a>(&'a self, keys: &[&str]) -> Result<Vec<&'a Value>, ExceptionalError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Single-result form of [`get_many`](Self::get_many): every key must
    /// exist, and the value of the last one is returned.
    ///
    /// Returns `Ok(None)` only when `keys` is empty.
    pub fn get_last<'a>(&'a self, keys: &[&str]) -> Result<Option<&'a Value>, ExceptionalError> {
        Ok(self.get_many(keys)?.pop())
    }

    /// Value at `key` rendered for use inside a message. Strings are
    /// rendered without quotes; everything else uses its JSON form.
    pub fn get_str(&self, key: &str) -> Result<String, ExceptionalError> {
        Ok(render(self.get(key)?))
    }

    /// All key/value pairs.
    pub fn all(&self) -> Vec<(&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    /// All keys.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// All values.
    pub fn values(&self) -> Vec<&Value> {
        self.entries.values().collect()
    }

    /// Whether `key` is present, regardless of its value.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` is present with a non-`null` value.
    pub fn is_defined(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|v| !v.is_null())
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MessageParams {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for MessageParams {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
