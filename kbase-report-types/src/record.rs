//! The record contract shared by every wire type.
//!
//! A record is a JSON object with a fixed list of declared, optional fields
//! plus an extension map holding whatever else arrived on the wire. The
//! `record!` macro expands a declarative field list into the struct, its
//! `with_*` builders, the [`Record`] impl and the serde glue.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{FieldError, SchemaError};

/// A value that can occupy a declared record field.
pub trait WireValue: Sized {
    /// Human-readable JSON type, used in mismatch errors.
    fn expected() -> Cow<'static, str>;

    fn from_wire(value: Value) -> Result<Self, FieldError>;

    fn to_wire(&self) -> Value;
}

/// A wire-level JSON object with declared fields and an extension map.
pub trait Record: WireValue + Clone + PartialEq + fmt::Debug {
    /// Type name as declared by the service.
    const TYPE_NAME: &'static str;

    /// Declared wire field names, in serialization order.
    const FIELDS: &'static [&'static str];

    fn from_json_map(map: Map<String, Value>) -> Result<Self, SchemaError>;

    /// Declared fields in order (absent ones skipped), then extensions in
    /// insertion order.
    fn to_json_map(&self) -> Map<String, Value>;

    fn extensions(&self) -> &Map<String, Value>;

    fn extensions_mut(&mut self) -> &mut Map<String, Value>;

    fn is_declared(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }

    fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions().get(name)
    }

    /// Store an undeclared field for re-emission. Returns the previous value.
    fn set_extension(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, SchemaError> {
        let name = name.into();
        if Self::is_declared(&name) {
            return Err(SchemaError::ReservedField {
                record: Self::TYPE_NAME,
                name,
            });
        }
        Ok(self.extensions_mut().insert(name, value.into()))
    }

    /// Remove an extension entry, keeping the order of the others.
    fn remove_extension(&mut self, name: &str) -> Option<Value> {
        self.extensions_mut().shift_remove(name)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn found<T: WireValue>(value: &Value) -> FieldError {
    FieldError::new(T::expected(), format!("found {}", json_kind(value)))
}

impl WireValue for String {
    fn expected() -> Cow<'static, str> {
        Cow::Borrowed("string")
    }

    fn from_wire(value: Value) -> Result<Self, FieldError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(found::<Self>(&other)),
        }
    }

    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl WireValue for i64 {
    fn expected() -> Cow<'static, str> {
        Cow::Borrowed("integer")
    }

    fn from_wire(value: Value) -> Result<Self, FieldError> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                FieldError::new(
                    Self::expected(),
                    format!("{n} does not fit a signed 64-bit integer"),
                )
            }),
            other => Err(found::<Self>(&other)),
        }
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for f64 {
    fn expected() -> Cow<'static, str> {
        Cow::Borrowed("number")
    }

    fn from_wire(value: Value) -> Result<Self, FieldError> {
        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                FieldError::new(Self::expected(), format!("{n} is not representable"))
            }),
            other => Err(found::<Self>(&other)),
        }
    }

    // Non-finite values have no JSON form and come out as null.
    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn expected() -> Cow<'static, str> {
        Cow::Owned(format!("array of {}", T::expected()))
    }

    fn from_wire(value: Value) -> Result<Self, FieldError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_wire(item).map_err(|e| e.at_index(i)))
                .collect(),
            other => Err(found::<Self>(&other)),
        }
    }

    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }
}

#[doc(hidden)]
pub fn decode_nested<T: Record>(value: Value) -> Result<T, FieldError> {
    match value {
        Value::Object(map) => T::from_json_map(map).map_err(|err| match err {
            SchemaError::SchemaMismatch {
                field,
                expected,
                detail,
                ..
            } => FieldError {
                path: field,
                expected,
                detail,
            },
            other => FieldError::new(T::expected(), other.to_string()),
        }),
        other => Err(found::<T>(&other)),
    }
}

#[doc(hidden)]
pub fn take_field<T: WireValue>(
    map: &mut Map<String, Value>,
    record: &'static str,
    wire: &str,
) -> Result<Option<T>, SchemaError> {
    match map.shift_remove(wire) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::from_wire(value)
            .map(Some)
            .map_err(|e| e.in_field(wire).into_schema_error(record)),
    }
}

#[doc(hidden)]
pub fn put_field<T: WireValue>(out: &mut Map<String, Value>, wire: &str, value: &Option<T>) {
    if let Some(value) = value {
        out.insert(wire.to_string(), value.to_wire());
    }
}

/// Extension entries shadowing a declared name are dropped; the declared
/// field always owns its key.
#[doc(hidden)]
pub fn put_extensions(
    out: &mut Map<String, Value>,
    declared: &[&str],
    extensions: &Map<String, Value>,
) {
    for (name, value) in extensions {
        if declared.contains(&name.as_str()) || out.contains_key(name) {
            continue;
        }
        out.insert(name.clone(), value.clone());
    }
}

macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident = $type_name:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty = $wire:literal, $with:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )*
            /// Wire fields not declared on this type, in arrival order.
            pub extensions: serde_json::Map<String, serde_json::Value>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $with(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }

        impl $crate::record::Record for $name {
            const TYPE_NAME: &'static str = $type_name;
            const FIELDS: &'static [&'static str] = &[$($wire),*];

            fn from_json_map(
                mut map: serde_json::Map<String, serde_json::Value>,
            ) -> Result<Self, $crate::error::SchemaError> {
                Ok(Self {
                    $(
                        $field: $crate::record::take_field(&mut map, $type_name, $wire)?,
                    )*
                    extensions: map,
                })
            }

            fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
                let mut out = serde_json::Map::new();
                $(
                    $crate::record::put_field(&mut out, $wire, &self.$field);
                )*
                $crate::record::put_extensions(&mut out, Self::FIELDS, &self.extensions);
                out
            }

            fn extensions(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.extensions
            }

            fn extensions_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
                &mut self.extensions
            }
        }

        impl $crate::record::WireValue for $name {
            fn expected() -> std::borrow::Cow<'static, str> {
                std::borrow::Cow::Borrowed(concat!("object ", $type_name))
            }

            fn from_wire(
                value: serde_json::Value,
            ) -> Result<Self, $crate::error::FieldError> {
                $crate::record::decode_nested(value)
            }

            fn to_wire(&self) -> serde_json::Value {
                serde_json::Value::Object($crate::record::Record::to_json_map(self))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(
                    &$crate::record::Record::to_json_map(self),
                    serializer,
                )
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let map = <serde_json::Map<String, serde_json::Value> as serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                <Self as $crate::record::Record>::from_json_map(map)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    record! {
        /// Fixture covering every field kind.
        pub struct Probe = "Probe" {
            label: String = "label", with_label;
            count: i64 = "count", with_count;
            ratio: f64 = "ratio", with_ratio;
            tags: Vec<String> = "tags", with_tags;
        }
    }

    record! {
        pub struct Outer = "Outer" {
            inner: Probe = "inner", with_inner;
            items: Vec<Probe> = "items", with_items;
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn declared_fields_are_taken_and_the_rest_kept_in_order() {
        let probe = Probe::from_json_map(map(json!({
            "zeta": 1,
            "label": "x",
            "alpha": [true],
            "count": 3
        })))
        .expect("decode");

        assert_eq!(probe.label.as_deref(), Some("x"));
        assert_eq!(probe.count, Some(3));
        assert!(probe.ratio.is_none());
        let keys: Vec<&str> = probe.extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn null_declared_field_decodes_as_absent() {
        let probe = Probe::from_json_map(map(json!({ "label": null }))).expect("decode");
        assert!(probe.label.is_none());
        assert!(probe.extensions.is_empty());
    }

    #[test]
    fn integer_field_rejects_fractional_numbers() {
        let err = Probe::from_json_map(map(json!({ "count": 1.5 }))).expect_err("mismatch");
        assert_eq!(err.field(), Some("count"));
    }

    #[test]
    fn number_field_accepts_integers() {
        let probe = Probe::from_json_map(map(json!({ "ratio": 400 }))).expect("decode");
        assert_eq!(probe.ratio, Some(400.0));
    }

    #[test]
    fn nested_mismatch_reports_full_path() {
        let err = Outer::from_json_map(map(json!({
            "items": [{ "label": "ok" }, { "tags": ["a", 7] }]
        })))
        .expect_err("mismatch");

        match err {
            SchemaError::SchemaMismatch {
                record,
                field,
                expected,
                ..
            } => {
                assert_eq!(record, "Outer");
                assert_eq!(field, "items[1].tags[1]");
                assert_eq!(expected, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_record_must_be_an_object() {
        let err = Outer::from_json_map(map(json!({ "inner": "nope" }))).expect_err("mismatch");
        match err {
            SchemaError::SchemaMismatch {
                field, expected, ..
            } => {
                assert_eq!(field, "inner");
                assert_eq!(expected, "object Probe");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn set_extension_refuses_declared_names() {
        let mut probe = Probe::new();
        let err = probe.set_extension("label", "x").expect_err("reserved");
        assert!(matches!(err, SchemaError::ReservedField { .. }));

        let prev = probe.set_extension("extra", 1).expect("store");
        assert!(prev.is_none());
        let prev = probe.set_extension("extra", 2).expect("store");
        assert_eq!(prev, Some(json!(1)));
        assert_eq!(probe.extension("extra"), Some(&json!(2)));
    }

    #[test]
    fn remove_extension_keeps_remaining_order() {
        let mut probe = Probe::new();
        for name in ["a", "b", "c", "d"] {
            probe.set_extension(name, name).expect("store");
        }
        assert_eq!(probe.remove_extension("b"), Some(json!("b")));
        let keys: Vec<&str> = probe.extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn shadowing_extension_is_not_emitted() {
        let mut probe = Probe::new().with_label("declared");
        probe
            .extensions
            .insert("label".to_string(), json!("shadow"));

        let out = probe.to_json_map();
        assert_eq!(out.get("label"), Some(&json!("declared")));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn vec_expected_names_element_type() {
        assert_eq!(<Vec<i64> as WireValue>::expected(), "array of integer");
        assert_eq!(<Vec<Probe> as WireValue>::expected(), "array of object Probe");
    }
}
