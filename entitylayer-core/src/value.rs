//! Generic value and record model for entity store operations.
//!
//! Callers of an entity store only ever see these types: plain scalars, date/time
//! values, sequences, and nested records. Backend-native wrapper types (BSON
//! documents, object identifiers, symbols, and so on) are converted into this
//! model by the backend before a record crosses the API boundary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EntityStoreResult;

/// A record is a mapping from field name to generic value, representing one
/// document in a collection. Records are transient: they are built by the
/// caller per operation or reconstructed by the backend from responses, and
/// are never cached or retained by the store.
pub type Record = BTreeMap<String, Value>;

/// The field name under which backends expose a record's internal identifier.
///
/// This is distinct from the caller-facing key field, which is configurable
/// on the store and defaults to [`DEFAULT_KEY_FIELD`].
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Default name of the caller-facing key field.
pub const DEFAULT_KEY_FIELD: &str = "key";

/// A generic field value.
///
/// This is the closed set of shapes a record field can take. Serialization
/// is untagged, so a record serializes to plain JSON with no enum wrappers.
///
/// # Example
///
/// ```ignore
/// use entitylayer_core::value::{Record, Value};
///
/// let mut record = Record::new();
/// record.insert("RoomNum".to_string(), Value::from("306"));
/// record.insert("Floor".to_string(), Value::from(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An absent or null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer. Backends widen smaller integer kinds into this.
    Int(i64),
    /// A double-precision float.
    Double(f64),
    /// A UTF-8 string. Backend identifier and symbol wrappers convert to this.
    String(String),
    /// Raw bytes, for backends with a binary value kind.
    Bytes(Vec<u8>),
    /// A point in time, millisecond precision.
    DateTime(DateTime<Utc>),
    /// A sequence of values, each converted element-wise.
    Array(Vec<Value>),
    /// A nested record.
    Record(Record),
}

impl Value {
    /// Returns the contained string, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained integer, if this value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the contained record, if this value is a nested record.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the contained sequence, if this value is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Projects this value to JSON.
    ///
    /// Date/time values render as RFC 3339 strings, byte values as number
    /// arrays, everything else as its plain JSON counterpart.
    ///
    /// # Errors
    ///
    /// Returns a [`Serialization`](crate::error::EntityStoreError::Serialization)
    /// error if the projection fails.
    pub fn to_json(&self) -> EntityStoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
