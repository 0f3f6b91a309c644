/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document value types.
//!
//! A document is a tree of maps, arrays, and scalars. The root of every
//! document is a [`DataMap`]; everything below it is a [`DataValue`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

/// A value inside a document.
///
/// Serializes to and from the natural JSON shape (untagged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// A null value.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// An integer value.
    Integer(i64),

    /// A floating point value.
    Float(f64),

    /// A string value.
    String(String),

    /// An ordered, 0-indexed array.
    Array(Vec<DataValue>),

    /// A map of string keys to values.
    Map(DataMap),
}

/// The kind of a [`DataValue`], used for classification and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Map,
    Array,
    String,
    Integer,
    Float,
    Bool,
    Null,
}

impl DataKind {
    /// Lowercase name of the kind, as shown in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Map => "map",
            DataKind::Array => "array",
            DataKind::String => "string",
            DataKind::Integer => "integer",
            DataKind::Float => "float",
            DataKind::Bool => "boolean",
            DataKind::Null => "null",
        }
    }

    /// Whether this is a scalar kind (not a map or an array).
    pub fn is_scalar(self) -> bool {
        !matches!(self, DataKind::Map | DataKind::Array)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DataValue {
    /// Classify this value.
    pub fn kind(&self) -> DataKind {
        match self {
            DataValue::Null => DataKind::Null,
            DataValue::Bool(_) => DataKind::Bool,
            DataValue::Integer(_) => DataKind::Integer,
            DataValue::Float(_) => DataKind::Float,
            DataValue::String(_) => DataKind::String,
            DataValue::Array(_) => DataKind::Array,
            DataValue::Map(_) => DataKind::Map,
        }
    }

    /// Look up a child by key.
    ///
    /// Returns `None` when the key is absent or when this value is not a map.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        match self {
            DataValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up an array element by index.
    ///
    /// Returns `None` when the index is out of bounds or when this value is
    /// not an array.
    pub fn get_index(&self, index: usize) -> Option<&DataValue> {
        match self {
            DataValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Number of children of a map or an array. Scalars have no children.
    pub fn len(&self) -> usize {
        match self {
            DataValue::Array(items) => items.len(),
            DataValue::Map(map) => map.len(),
            _ => 0,
        }
    }

    /// Whether this value has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(value: Vec<DataValue>) -> Self {
        DataValue::Array(value)
    }
}

impl From<DataMap> for DataValue {
    fn from(value: DataMap) -> Self {
        DataValue::Map(value)
    }
}

/// A map of string keys to values; the root of every document.
///
/// Key order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMap {
    entries: HashMap<String, DataValue>,
}

impl DataMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a child by key.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, overwriting any existing entry.
    ///
    /// Returns the previous value for the key, if there was one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DataValue>,
    ) -> Option<DataValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, DataValue> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DataMap {
    type Item = (&'a String, &'a DataValue);
    type IntoIter = hash_map::Iter<'a, String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for DataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataMap {
        let inner: DataMap = [("salary", DataValue::Integer(50000))].into_iter().collect();
        [
            ("employee", DataValue::Map(inner)),
            ("tags", DataValue::Array(vec!["a".into(), "b".into()])),
            ("name", "Alice".into()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(DataValue::Null.kind(), DataKind::Null);
        assert_eq!(DataValue::Bool(true).kind(), DataKind::Bool);
        assert_eq!(DataValue::Integer(1).kind(), DataKind::Integer);
        assert_eq!(DataValue::Float(1.5).kind(), DataKind::Float);
        assert_eq!(DataValue::from("x").kind(), DataKind::String);
        assert_eq!(DataValue::Array(vec![]).kind(), DataKind::Array);
        assert_eq!(DataValue::Map(DataMap::new()).kind(), DataKind::Map);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DataKind::Bool.to_string(), "boolean");
        assert_eq!(DataKind::Map.to_string(), "map");
        assert!(DataKind::Integer.is_scalar());
        assert!(!DataKind::Array.is_scalar());
    }

    #[test]
    fn test_get_on_map_and_non_map() {
        let doc = DataValue::Map(sample());
        let employee = doc.get("employee").expect("employee present");
        assert_eq!(employee.get("salary"), Some(&DataValue::Integer(50000)));
        assert_eq!(employee.get("missing"), None);

        // Keyed lookup on scalars and arrays never succeeds
        assert_eq!(doc.get("name").and_then(|v| v.get("x")), None);
        assert_eq!(doc.get("tags").and_then(|v| v.get("0")), None);
    }

    #[test]
    fn test_get_index() {
        let doc = sample();
        let tags = doc.get("tags").expect("tags present");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get_index(1), Some(&DataValue::from("b")));
        assert_eq!(tags.get_index(2), None);
        assert_eq!(DataValue::from("ab").get_index(0), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut doc = sample();
        let previous = doc.insert("name", "Bob");
        assert_eq!(previous, Some(DataValue::from("Alice")));
        assert_eq!(doc.get("name").and_then(DataValue::as_str), Some("Bob"));

        assert_eq!(doc.insert("fresh", 3_i64), None);
        assert_eq!(doc.get("fresh").and_then(DataValue::as_i64), Some(3));
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(DataValue::default(), DataValue::Null);
        assert!(DataMap::default().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut doc = sample();
        assert!(doc.remove("name").is_some());
        assert!(!doc.contains_key("name"));
        assert_eq!(doc.remove("name"), None);
    }
}
