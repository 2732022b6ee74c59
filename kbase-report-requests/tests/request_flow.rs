//! End-to-end request preparation: decode a caller payload, validate,
//! envelope, then shape the saved report and unwrap the reply.

use kbase_report_requests::{
    CreateExtendedReport, LegacyCreate, Method, MethodKind, RequestError, SaveObjectsParams,
    UploadedHandle, WorkspaceScoped, decode_reply, linked_file_from, prepare_call, report_name,
    saved_report_from_extended,
};
use kbase_report_types::extended::CreateExtendedReportParams;
use kbase_report_types::shared::{File, LinkedFile};
use kbase_report_types::{Record, wire};
use pretty_assertions::assert_eq;
use serde_json::json;

fn extended_payload() -> serde_json::Value {
    json!({
        "message": "Assembly finished",
        "objects_created": [{ "ref": "41/5/1", "description": "contigs" }],
        "html_links": [
            { "path": "/kb/module/work/tmp/html", "name": "index.html" },
            { "shock_id": "abc-123", "name": "detail.html" }
        ],
        "direct_html_link_index": 0,
        "file_links": [{ "path": "/kb/module/work/tmp/out.zip", "name": "out.zip" }],
        "report_object_name": "assembly_report",
        "html_window_height": 600,
        "workspace_name": "me:narrative_1",
        "app_version": "1.2.0"
    })
}

#[test]
fn extended_report_flows_from_payload_to_saved_object() {
    let params: CreateExtendedReportParams =
        CreateExtendedReport::decode_params(extended_payload()).expect("decode");
    assert_eq!(params.extension("app_version"), Some(&json!("1.2.0")));

    let request = prepare_call::<CreateExtendedReport>(&params, "17").expect("valid");
    assert_eq!(request.method, "KBaseReport.create_extended_report");
    assert_eq!(request.params.len(), 1);
    assert_eq!(request.params[0]["app_version"], json!("1.2.0"));

    let handle = |n: usize| UploadedHandle {
        hid: format!("KBH_{n}"),
        url: "https://kbase.us/services/shock-api".to_string(),
        id: format!("node-{n}"),
    };
    let link_all = |files: &[File], offset: usize| -> Vec<LinkedFile> {
        files
            .iter()
            .enumerate()
            .map(|(i, file)| linked_file_from(file, &handle(offset + i)))
            .collect()
    };
    let file_links = link_all(params.file_links.as_deref().unwrap_or_default(), 0);
    let html_links = link_all(params.html_links.as_deref().unwrap_or_default(), 10);
    let saved = saved_report_from_extended(&params, file_links, html_links);
    let target = params.workspace_target().expect("target");
    let save = SaveObjectsParams::for_report(target, &saved, report_name(&params));
    let save = save.to_value().expect("json");

    assert_eq!(save["workspace"], json!("me:narrative_1"));
    assert_eq!(save["objects"][0]["name"], json!("assembly_report"));
    assert_eq!(save["objects"][0]["hidden"], json!(1));
    let data = &save["objects"][0]["data"];
    assert_eq!(data["text_message"], json!("Assembly finished"));
    assert_eq!(data["html_links"][1]["name"], json!("detail.html"));
    assert_eq!(data["html_links"][1]["handle"], json!("KBH_11"));
    assert_eq!(
        data["html_links"][1]["URL"],
        json!("https://kbase.us/services/shock-api/node/node-11")
    );
    assert_eq!(data["file_links"][0]["label"], json!(""));
    assert_eq!(data["html_window_height"], json!(600.0));

    let reply = r#"{"version":"1.1","id":"17","result":[{"ref":"41/9/1","name":"assembly_report"}]}"#;
    let info = decode_reply::<CreateExtendedReport>(reply).expect("reply");
    assert_eq!(info.reference.as_deref(), Some("41/9/1"));
}

#[test]
fn every_violation_is_reported_at_once() {
    let payload = json!({
        "workspace_id": -4,
        "objects_created": [{ "ref": "" }],
        "html_links": [{ "name": "orphan.html" }],
        "direct_html_link_index": 3,
        "summary_window_height": 0.5
    });
    let err = MethodKind::CreateExtendedReport
        .check(payload)
        .expect_err("invalid");
    let RequestError::Invalid { violations } = err else {
        panic!("expected invalid, got {err:?}");
    };
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "workspace_id",
            "objects_created[0].ref",
            "html_links[0]",
            "direct_html_link_index",
            "summary_window_height",
        ]
    );
}

#[test]
fn workspace_must_be_named_exactly_once() {
    let both = json!({ "workspace_name": "ws", "workspace_id": 1, "report": {} });
    let err = MethodKind::Create.check(both).expect_err("both");
    assert!(matches!(err, RequestError::MissingRequiredContext { .. }));
    assert_eq!(err.exit_code(), 2);

    let neither = json!({ "report": { "text_message": "hi" } });
    let err = MethodKind::Create.check(neither).expect_err("neither");
    assert!(matches!(err, RequestError::MissingRequiredContext { .. }));
}

#[test]
fn create_requires_a_report() {
    let err = MethodKind::Create
        .check(json!({ "workspace_id": 3 }))
        .expect_err("no report");
    assert_eq!(
        err.to_string(),
        "invalid request parameters: report: required field"
    );
}

#[test]
fn legacy_create_checks_the_full_report() {
    let payload = json!({
        "workspace_name": "ws",
        "report": {
            "text_message": "old style",
            "objects_created": [{ "description": "no ref" }],
            "html_links": [{ "handle": "KBH_2", "URL": "https://x" }],
            "direct_html_link_index": 1
        }
    });
    let params = LegacyCreate::decode_params(payload).expect("decode");
    let err = LegacyCreate::validate(&params).expect_err("invalid");
    assert_eq!(
        err.to_string(),
        "invalid request parameters: report.objects_created[0].ref: required field; \
         report.direct_html_link_index: index 1 is out of bounds for 1 html_links"
    );
}

#[test]
fn schema_mismatch_is_a_runtime_error() {
    let err = MethodKind::CreateExtendedReport
        .check(json!({ "workspace_id": "not-a-number" }))
        .expect_err("mismatch");
    assert!(!err.is_rejection());
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("workspace_id"));
}

#[test]
fn canonical_params_are_byte_stable() {
    let a = MethodKind::CreateExtendedReport
        .check(extended_payload())
        .expect("valid");
    let b = MethodKind::CreateExtendedReport
        .check(extended_payload())
        .expect("valid");
    assert_eq!(wire_text(&a), wire_text(&b));

    let decoded: CreateExtendedReportParams = wire::from_value(a[0].clone()).expect("decode");
    assert_eq!(decoded.html_window_height, Some(600.0));
}

fn wire_text(params: &[serde_json::Value]) -> String {
    serde_json::to_string(params).expect("json")
}
