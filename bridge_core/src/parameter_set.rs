//! # Parameter Sets
//!
//! A [`ParameterSet`] is the snapshot of form values taken for one validation
//! or submission attempt: an insertion-ordered map from parameter key to the
//! raw text typed by the user. Values stay strings until a rule needs a
//! number, so the set serializes exactly as the form holds it.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::parameter_set::ParameterSet;
//!
//! let mut params = ParameterSet::new();
//! params.insert("TOPRL", "110000");
//! params.insert("SOFL", "108000");
//!
//! assert_eq!(params.get("TOPRL"), Some("110000"));
//! assert_eq!(params.number("SOFL"), Some(108000.0));
//!
//! let json = serde_json::to_string(&params).unwrap();
//! assert_eq!(json, r#"{"TOPRL":"110000","SOFL":"108000"}"#);
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parse a form value as a number.
///
/// Surrounding whitespace is ignored. Returns `None` for empty or malformed
/// text and for `NaN`, which never compares true against anything.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Ordered mapping from parameter key to raw string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Create an empty set
    pub fn new() -> Self {
        ParameterSet { entries: Vec::new() }
    }

    /// Insert or replace a value.
    ///
    /// Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Value for a key when present and not blank
    pub fn filled(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Numeric value for a key when present, filled and parseable
    pub fn number(&self, key: &str) -> Option<f64> {
        self.filled(key).and_then(parse_number)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Pretty-printed JSON object, as placed on the clipboard
    pub fn to_pretty_json(&self) -> String {
        // A map of strings to strings always serializes.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ParameterSetVisitor;

impl<'de> Visitor<'de> for ParameterSetVisitor {
    type Value = ParameterSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of parameter names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = ParameterSet::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            set.insert(key, value);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParameterSetVisitor)
    }
}
