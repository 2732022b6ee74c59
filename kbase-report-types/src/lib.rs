//! Wire records (schemas-as-code) for the KBaseReport service.
//!
//! # Design constraints
//! - Every declared field is optional; absent fields are never emitted.
//! - Unknown wire fields survive a decode/encode round trip unchanged.
//! - Output field order is fixed per type so serialized payloads diff cleanly.
//! - No I/O and no business rules. Request-level checks live with the caller.

#[macro_use]
pub mod record;

pub mod error;
pub mod extended;
pub mod legacy;
pub mod shared;
pub mod wire;

pub use error::{FieldError, SchemaError};
pub use record::{Record, WireValue};

/// Workspace type identifiers.
pub mod schema {
    pub const SERVICE_NAME: &str = "KBaseReport";
    /// Type of the object a report is saved as.
    pub const REPORT_OBJECT_TYPE: &str = "KBaseReport.Report";
}
