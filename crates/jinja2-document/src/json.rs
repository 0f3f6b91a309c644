/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion between documents and `serde_json` values.

use crate::error::{DocumentError, DocumentResult};
use crate::value::{DataMap, DataValue};
use serde_json::{Number, Value};

impl From<Value> for DataValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DataValue::Null,
            Value::Bool(b) => DataValue::Bool(b),
            Value::Number(n) => number_to_value(&n),
            Value::String(s) => DataValue::String(s),
            Value::Array(items) => {
                DataValue::Array(items.into_iter().map(DataValue::from).collect())
            }
            Value::Object(entries) => DataValue::Map(entries.into_iter().collect()),
        }
    }
}

impl From<DataValue> for Value {
    fn from(value: DataValue) -> Self {
        match value {
            DataValue::Null => Value::Null,
            DataValue::Bool(b) => Value::Bool(b),
            DataValue::Integer(i) => Value::Number(i.into()),
            // NaN and infinities have no JSON form
            DataValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            DataValue::String(s) => Value::String(s),
            DataValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            DataValue::Map(map) => Value::from(map),
        }
    }
}

impl From<DataMap> for Value {
    fn from(map: DataMap) -> Self {
        Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                .collect(),
        )
    }
}

/// Integers that fit in `i64` stay integers; everything else becomes a float.
fn number_to_value(n: &Number) -> DataValue {
    match n.as_i64() {
        Some(i) => DataValue::Integer(i),
        None => n.as_f64().map_or(DataValue::Null, DataValue::Float),
    }
}

impl DataMap {
    /// Parse a document from JSON text.
    ///
    /// The root of the JSON text must be an object.
    pub fn from_json_str(text: &str) -> DocumentResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for DataMap {
    type Error = DocumentError;

    fn try_from(value: Value) -> DocumentResult<Self> {
        match DataValue::from(value) {
            DataValue::Map(map) => Ok(map),
            other => Err(DocumentError::NotAMap { kind: other.kind() }),
        }
    }
}
