//! Error types for request preparation and reply handling.
//!
//! Two classes of failure, mirroring how the CLI reports them:
//! - Request rejections (exit code 2): the caller's parameters break a rule
//!   the service enforces, so the call is never sent.
//! - Runtime errors (exit code 1): undecodable payloads, service-side errors,
//!   malformed replies.

use std::fmt;

use kbase_report_types::SchemaError;
use thiserror::Error;

/// One broken rule in a set of request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Wire path of the offending value, e.g. `html_links[2]`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum RequestError {
    /// A caller-level contract was broken, e.g. no workspace was named.
    #[error("missing required context: {message}")]
    MissingRequiredContext { message: String },

    /// Field-level rule violations, collected in wire order.
    #[error("invalid request parameters: {}", render_violations(.violations))]
    Invalid { violations: Vec<Violation> },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The service answered with a JSON-RPC error object.
    #[error("{name} ({code}): {message}")]
    Remote {
        name: String,
        code: i64,
        message: String,
        detail: Option<String>,
    },

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl RequestError {
    /// Returns true if the request was refused before it could be sent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RequestError::MissingRequiredContext { .. } | RequestError::Invalid { .. }
        )
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_rejection() { 2 } else { 1 }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Schema(SchemaError::Json(err))
    }
}

/// Result type alias using RequestError.
pub type RequestResult<T> = Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::{RequestError, Violation};

    #[test]
    fn rejections_report_exit_code_2() {
        let err = RequestError::MissingRequiredContext {
            message: "no workspace".to_string(),
        };
        assert!(err.is_rejection());
        assert_eq!(err.exit_code(), 2);

        let err = RequestError::Invalid {
            violations: vec![Violation::new("workspace_id", "must be >= 0")],
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn runtime_errors_report_exit_code_1() {
        let err = RequestError::UnknownMethod("nope".to_string());
        assert!(!err.is_rejection());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_display_lists_every_violation() {
        let err = RequestError::Invalid {
            violations: vec![
                Violation::new("workspace_name", "must not be empty"),
                Violation::new("html_links[1]", "requires path or shock_id"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid request parameters: workspace_name: must not be empty; html_links[1]: requires path or shock_id"
        );
    }
}
