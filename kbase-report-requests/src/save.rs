//! Shaping a report into the workspace object the service saves.
//!
//! The service resolves the workspace, uploads any files and then calls
//! `save_objects` with one hidden `KBaseReport.Report` object. These helpers
//! build that object from request parameters so callers and tests can see
//! exactly what will be stored.

use kbase_report_types::extended::{CreateExtendedReportParams, ReportInfo, SimpleReport};
use kbase_report_types::legacy::Report;
use kbase_report_types::shared::{File, LinkedFile};
use kbase_report_types::{Record, SchemaError, schema, wire};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{RequestError, RequestResult};
use crate::workspace::WorkspaceTarget;

/// `report_<uuid4>`, with an optional caller prefix in front.
pub fn generate_report_name(prefix: Option<&str>) -> String {
    format!("{}report_{}", prefix.unwrap_or_default(), Uuid::new_v4())
}

/// The requested object name, or a generated one.
pub fn report_name(params: &CreateExtendedReportParams) -> String {
    match params.report_object_name.as_deref() {
        Some(name) => name.to_string(),
        None => generate_report_name(None),
    }
}

/// Workspace reference in `ws/obj/ver` form.
pub fn object_ref(workspace_id: i64, object_id: i64, version: i64) -> String {
    format!("{workspace_id}/{object_id}/{version}")
}

// Positions within a workspace object_info tuple.
const INFO_OBJECT_ID: usize = 0;
const INFO_NAME: usize = 1;
const INFO_VERSION: usize = 4;
const INFO_WORKSPACE_ID: usize = 6;

/// Build the method result from the `object_info` tuple `save_objects`
/// returns for the report.
pub fn report_info_from_object_info(info: &[Value]) -> RequestResult<ReportInfo> {
    let int_at = |index: usize| {
        info.get(index).and_then(Value::as_i64).ok_or_else(|| {
            RequestError::MalformedReply(format!("object_info[{index}] is not an integer"))
        })
    };
    let name = info
        .get(INFO_NAME)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RequestError::MalformedReply(format!("object_info[{INFO_NAME}] is not a string"))
        })?;

    Ok(ReportInfo::new()
        .with_reference(object_ref(
            int_at(INFO_WORKSPACE_ID)?,
            int_at(INFO_OBJECT_ID)?,
            int_at(INFO_VERSION)?,
        ))
        .with_name(name))
}

/// The saved form of a simple report: `objects_created` defaults to an empty
/// list and everything the caller sent is carried over.
///
/// Fails only if an undeclared field of the simple report collides with a
/// saved-report field of another type.
pub fn saved_report_from_simple(report: &SimpleReport) -> Result<Report, SchemaError> {
    let mut data = Map::new();
    data.insert("objects_created".to_string(), Value::Array(Vec::new()));
    for (name, value) in report.to_json_map() {
        data.insert(name, value);
    }
    Report::from_json_map(data)
}

/// The handle returned when a file is uploaded to or claimed in the file
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedHandle {
    pub hid: String,
    /// Base URL of the file store.
    pub url: String,
    /// Node id within the file store.
    pub id: String,
}

impl UploadedHandle {
    /// Download URL of the node.
    pub fn node_url(&self) -> String {
        format!("{}/node/{}", self.url, self.id)
    }
}

/// The saved link for a caller's file once it has been uploaded.
///
/// `name` and `label` default to empty strings; `description` is kept only
/// when the caller gave one.
pub fn linked_file_from(file: &File, handle: &UploadedHandle) -> LinkedFile {
    LinkedFile {
        handle: Some(handle.hid.clone()),
        description: file.description.clone(),
        name: Some(file.name.clone().unwrap_or_default()),
        label: Some(file.label.clone().unwrap_or_default()),
        url: Some(handle.node_url()),
        extensions: Map::new(),
    }
}

/// The saved form of an extended report, given the links the service
/// produced after uploading `file_links` and `html_links`.
///
/// Window heights have no field on the saved report and are stored as
/// extension entries under their own names.
pub fn saved_report_from_extended(
    params: &CreateExtendedReportParams,
    file_links: Vec<LinkedFile>,
    html_links: Vec<LinkedFile>,
) -> Report {
    let mut report = Report {
        text_message: params.message.clone(),
        warnings: params.warnings.clone(),
        objects_created: Some(params.objects_created.clone().unwrap_or_default()),
        file_links: Some(file_links),
        html_links: Some(html_links),
        direct_html: params.direct_html.clone(),
        direct_html_link_index: params.direct_html_link_index,
        extensions: Map::new(),
    };
    for (name, height) in [
        ("html_window_height", params.html_window_height),
        ("summary_window_height", params.summary_window_height),
    ] {
        if let Some(height) = height {
            report.extensions.insert(name.to_string(), Value::from(height));
        }
    }
    report
}

/// One object in a `save_objects` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSaveData {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: Value,
    pub name: String,
    pub meta: Map<String, Value>,
    pub hidden: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Vec<Value>>,
}

/// Parameters of the workspace `save_objects` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveObjectsParams {
    pub target: WorkspaceTarget,
    pub objects: Vec<ObjectSaveData>,
}

impl SaveObjectsParams {
    /// A single hidden report object.
    pub fn for_report(target: WorkspaceTarget, report: &Report, name: impl Into<String>) -> Self {
        Self {
            target,
            objects: vec![ObjectSaveData {
                type_name: schema::REPORT_OBJECT_TYPE.to_string(),
                data: wire::to_value(report),
                name: name.into(),
                meta: Map::new(),
                hidden: 1,
                provenance: None,
            }],
        }
    }

    /// JSON form, with the workspace under `id` or `workspace`.
    pub fn to_value(&self) -> RequestResult<Value> {
        let (key, workspace) = self.target.save_field();
        let mut out = Map::new();
        out.insert(key.to_string(), workspace);
        out.insert("objects".to_string(), serde_json::to_value(&self.objects)?);
        Ok(Value::Object(out))
    }
}
