//! Error types for decoding KBaseReport records.
//!
//! Decoding is the only fallible operation on a record. Encoding never fails
//! except when rendering to pretty-printed text.

use std::borrow::Cow;

use thiserror::Error;

/// The error type returned by every decode entry point.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A declared field carried a value of the wrong JSON type.
    ///
    /// `field` is the wire path relative to `record`, e.g. `workspace_id`,
    /// `report.warnings[2]` or `html_links[0].name`.
    #[error("{record}.{field}: expected {expected}: {detail}")]
    SchemaMismatch {
        record: &'static str,
        field: String,
        expected: Cow<'static, str>,
        detail: String,
    },

    /// The top-level payload was not a JSON object.
    #[error("{record}: expected a JSON object, found {found}")]
    NotAnObject {
        record: &'static str,
        found: &'static str,
    },

    /// An extension entry was given the name of a declared field.
    #[error("{record}: '{name}' is a declared field and cannot be stored as an extension")]
    ReservedField { record: &'static str, name: String },

    /// The input was not well-formed JSON.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// The offending wire path, for mismatch errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::SchemaMismatch { field, .. } => Some(field),
            SchemaError::ReservedField { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, SchemaError::SchemaMismatch { .. })
    }
}

/// A field-level decode failure before it is attached to a record name.
///
/// Nested values report failures relative to themselves; each enclosing
/// field or list index prefixes its own segment on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub path: String,
    pub expected: Cow<'static, str>,
    pub detail: String,
}

impl FieldError {
    pub fn new(expected: Cow<'static, str>, detail: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            expected,
            detail: detail.into(),
        }
    }

    /// Prefix a named field segment.
    pub fn in_field(mut self, name: &str) -> Self {
        self.path = if self.path.is_empty() {
            name.to_string()
        } else if self.path.starts_with('[') {
            format!("{name}{}", self.path)
        } else {
            format!("{name}.{}", self.path)
        };
        self
    }

    /// Prefix a list index segment.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path = if self.path.is_empty() || self.path.starts_with('[') {
            format!("[{index}]{}", self.path)
        } else {
            format!("[{index}].{}", self.path)
        };
        self
    }

    pub fn into_schema_error(self, record: &'static str) -> SchemaError {
        SchemaError::SchemaMismatch {
            record,
            field: self.path,
            expected: self.expected,
            detail: self.detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_compose_outward() {
        let err = FieldError::new(Cow::Borrowed("string"), "invalid type")
            .in_field("name")
            .at_index(1)
            .in_field("html_links");
        assert_eq!(err.path, "html_links[1].name");

        let err = FieldError::new(Cow::Borrowed("string"), "invalid type")
            .at_index(2)
            .in_field("warnings")
            .in_field("report");
        assert_eq!(err.path, "report.warnings[2]");
    }

    #[test]
    fn mismatch_display_names_record_and_field() {
        let err = FieldError::new(Cow::Borrowed("integer"), "invalid type: string")
            .in_field("workspace_id")
            .into_schema_error("CreateParams");
        assert_eq!(err.field(), Some("workspace_id"));
        assert!(err.is_mismatch());
        assert_eq!(
            err.to_string(),
            "CreateParams.workspace_id: expected integer: invalid type: string"
        );
    }
}
