//! Decode and encode entry points for records.
//!
//! These are the only operations the core exposes to an RPC layer: JSON in,
//! record out, and back.

use serde_json::Value;

use crate::error::SchemaError;
use crate::record::{Record, json_kind};

/// Decode a record from an already-parsed JSON value.
pub fn from_value<T: Record>(value: Value) -> Result<T, SchemaError> {
    match value {
        Value::Object(map) => T::from_json_map(map),
        other => Err(SchemaError::NotAnObject {
            record: T::TYPE_NAME,
            found: json_kind(&other),
        }),
    }
}

pub fn from_str<T: Record>(s: &str) -> Result<T, SchemaError> {
    let value: Value = serde_json::from_str(s)?;
    from_value(value)
}

pub fn from_slice<T: Record>(bytes: &[u8]) -> Result<T, SchemaError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(value)
}

pub fn to_value<T: Record>(record: &T) -> Value {
    Value::Object(record.to_json_map())
}

/// Compact JSON text. Identical records always produce identical bytes.
pub fn to_string<T: Record>(record: &T) -> String {
    to_value(record).to_string()
}

pub fn to_string_pretty<T: Record>(record: &T) -> Result<String, SchemaError> {
    Ok(serde_json::to_string_pretty(&to_value(record))?)
}
