//! Record types addressable from the command line.

use std::fmt;
use std::str::FromStr;

use kbase_report_types::{Record, SchemaError, extended, legacy, shared, wire};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Report,
    LegacyCreateParams,
    CreateReportParams,
    SimpleReport,
    CreateParams,
    CreateExtendedReportParams,
    ReportInfo,
    Status,
    WorkspaceObject,
    File,
    LinkedFile,
}

impl RecordKind {
    pub const ALL: [RecordKind; 11] = [
        RecordKind::Report,
        RecordKind::LegacyCreateParams,
        RecordKind::CreateReportParams,
        RecordKind::SimpleReport,
        RecordKind::CreateParams,
        RecordKind::CreateExtendedReportParams,
        RecordKind::ReportInfo,
        RecordKind::Status,
        RecordKind::WorkspaceObject,
        RecordKind::File,
        RecordKind::LinkedFile,
    ];

    /// Name accepted by `--record`. The two `CreateParams` types are told
    /// apart by a `legacy.` prefix.
    pub fn name(self) -> &'static str {
        match self {
            RecordKind::Report => "Report",
            RecordKind::LegacyCreateParams => "legacy.CreateParams",
            RecordKind::CreateReportParams => "CreateReportParams",
            RecordKind::SimpleReport => "SimpleReport",
            RecordKind::CreateParams => "CreateParams",
            RecordKind::CreateExtendedReportParams => "CreateExtendedReportParams",
            RecordKind::ReportInfo => "ReportInfo",
            RecordKind::Status => "Status",
            RecordKind::WorkspaceObject => "WorkspaceObject",
            RecordKind::File => "File",
            RecordKind::LinkedFile => "LinkedFile",
        }
    }

    /// Decode `value` as this record and re-encode it in canonical order.
    pub fn canonicalize(self, value: Value) -> Result<Value, SchemaError> {
        match self {
            RecordKind::Report => canonical::<legacy::Report>(value),
            RecordKind::LegacyCreateParams => canonical::<legacy::CreateParams>(value),
            RecordKind::CreateReportParams => canonical::<legacy::CreateReportParams>(value),
            RecordKind::SimpleReport => canonical::<extended::SimpleReport>(value),
            RecordKind::CreateParams => canonical::<extended::CreateParams>(value),
            RecordKind::CreateExtendedReportParams => {
                canonical::<extended::CreateExtendedReportParams>(value)
            }
            RecordKind::ReportInfo => canonical::<extended::ReportInfo>(value),
            RecordKind::Status => canonical::<extended::Status>(value),
            RecordKind::WorkspaceObject => canonical::<shared::WorkspaceObject>(value),
            RecordKind::File => canonical::<shared::File>(value),
            RecordKind::LinkedFile => canonical::<shared::LinkedFile>(value),
        }
    }
}

fn canonical<T: Record>(value: Value) -> Result<Value, SchemaError> {
    let record: T = wire::from_value(value)?;
    Ok(wire::to_value(&record))
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = RecordKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown record '{s}' (known: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.name().parse::<RecordKind>().unwrap(), kind);
        }
        assert!("Nope".parse::<RecordKind>().unwrap_err().contains("known:"));
    }

    #[test]
    fn test_canonicalize_reorders_declared_fields() {
        let value = json!({ "extra": 1, "name": "out.zip", "path": "/tmp/out.zip" });
        let out = RecordKind::File.canonicalize(value).unwrap();
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"path":"/tmp/out.zip","name":"out.zip","extra":1}"#
        );
    }

    #[test]
    fn test_canonicalize_reports_the_field() {
        let err = RecordKind::LegacyCreateParams
            .canonicalize(json!({ "workspace_id": "x" }))
            .unwrap_err();
        assert_eq!(err.field(), Some("workspace_id"));
    }
}
