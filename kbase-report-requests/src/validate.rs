//! Parameter checks the service applies before it saves a report.
//!
//! The records accept any well-typed payload. These checks run on the
//! calling side so a bad request is refused before it is sent: the
//! workspace rule first (as [`RequestError::MissingRequiredContext`]), then
//! every field rule, collected into one [`RequestError::Invalid`].
//!
//! Undeclared keys are not violations. The service rejects them, but records
//! carry them as extensions and callers decide whether to strip them.

use kbase_report_types::extended::{CreateExtendedReportParams, CreateParams, SimpleReport};
use kbase_report_types::legacy;
use kbase_report_types::shared::{File, WorkspaceObject};
use kbase_report_types::{Record, WireValue};
use tracing::debug;

use crate::error::{RequestError, RequestResult, Violation};
use crate::workspace::WorkspaceScoped;

#[derive(Debug, Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    fn workspace_fields<P: WorkspaceScoped>(&mut self, params: &P) {
        if params.workspace_name().is_some_and(str::is_empty) {
            self.push("workspace_name", "must not be empty");
        }
        if params.workspace_id().is_some_and(|id| id < 0) {
            self.push("workspace_id", "must be >= 0");
        }
    }

    fn objects_created(&mut self, prefix: &str, objects: &[WorkspaceObject]) {
        for (i, object) in objects.iter().enumerate() {
            match object.reference.as_deref() {
                None => self.push(format!("{prefix}[{i}].ref"), "required field"),
                Some("") => self.push(format!("{prefix}[{i}].ref"), "must not be empty"),
                Some(_) => {}
            }
        }
    }

    fn files(&mut self, prefix: &str, files: &[File]) {
        for (i, file) in files.iter().enumerate() {
            if !file.has_source() {
                self.push(format!("{prefix}[{i}]"), "requires path or shock_id");
            }
        }
    }

    fn link_index(&mut self, field: &str, index: Option<i64>, link_count: usize) {
        let Some(index) = index else {
            return;
        };
        if index < 0 {
            self.push(field, "must be >= 0");
        } else if link_count > 0 && index as u64 >= link_count as u64 {
            self.push(
                field,
                format!("index {index} is out of bounds for {link_count} html_links"),
            );
        }
    }

    /// `html_links` and `direct_html_link_index` come as a pair, and the
    /// report page is either inline `direct_html` or that pair.
    fn html_source(&mut self, params: &CreateExtendedReportParams) {
        let has_links = params.html_links.is_some();
        let has_index = params.direct_html_link_index.is_some();
        if has_links && !has_index {
            self.push(
                "html_links",
                "direct_html_link_index is required with html_links",
            );
        }
        if has_index && !has_links {
            self.push(
                "direct_html_link_index",
                "html_links is required with direct_html_link_index",
            );
        }
        if params.direct_html.is_some() && (has_links || has_index) {
            self.push(
                "direct_html",
                "supply only one of direct_html or html_links with direct_html_link_index",
            );
        }
    }

    fn window_height(&mut self, field: &str, height: Option<f64>) {
        // Also rejects NaN.
        if height.is_some_and(|h| !(h >= 1.0)) {
            self.push(field, "must be >= 1");
        }
    }

    fn finish(self, method: &str) -> RequestResult<()> {
        if self.violations.is_empty() {
            return Ok(());
        }
        debug!(
            method,
            violations = self.violations.len(),
            "rejecting request parameters"
        );
        Err(RequestError::Invalid {
            violations: self.violations,
        })
    }
}

/// Check parameters for `create` with a [`SimpleReport`].
pub fn validate_create(params: &CreateParams) -> RequestResult<()> {
    params.workspace_target()?;

    let mut checker = Checker::default();
    checker.workspace_fields(params);
    match &params.report {
        None => checker.push("report", "required field"),
        Some(report) => simple_report(&mut checker, report),
    }
    checker.finish("create")
}

/// The service also accepts `objects_created` inside a simple report even
/// though the record does not declare it; it arrives as an extension.
fn simple_report(checker: &mut Checker, report: &SimpleReport) {
    let Some(value) = report.extension("objects_created") else {
        return;
    };
    match Vec::<WorkspaceObject>::from_wire(value.clone()) {
        Ok(objects) => checker.objects_created("report.objects_created", &objects),
        Err(err) => checker.push(
            format!("report.objects_created{}", err.path),
            format!("expected {}", err.expected),
        ),
    }
}

/// Check parameters for `create_extended_report`.
pub fn validate_create_extended(params: &CreateExtendedReportParams) -> RequestResult<()> {
    params.workspace_target()?;

    let mut checker = Checker::default();
    checker.workspace_fields(params);
    if let Some(objects) = &params.objects_created {
        checker.objects_created("objects_created", objects);
    }
    let html_links = params.html_links.as_deref().unwrap_or_default();
    checker.files("html_links", html_links);
    if let Some(files) = &params.file_links {
        checker.files("file_links", files);
    }
    checker.link_index(
        "direct_html_link_index",
        params.direct_html_link_index,
        html_links.len(),
    );
    checker.html_source(params);
    checker.window_height("html_window_height", params.html_window_height);
    checker.window_height("summary_window_height", params.summary_window_height);
    checker.finish("create_extended_report")
}

/// Check parameters for the original `create` with a full [`legacy::Report`].
pub fn validate_legacy_create(params: &legacy::CreateParams) -> RequestResult<()> {
    params.workspace_target()?;

    let mut checker = Checker::default();
    checker.workspace_fields(params);
    match &params.report {
        None => checker.push("report", "required field"),
        Some(report) => legacy_report(&mut checker, report),
    }
    checker.finish("create")
}

/// Check the narrow name-only `create` parameters.
pub fn validate_create_report(params: &legacy::CreateReportParams) -> RequestResult<()> {
    params.workspace_target()?;

    let mut checker = Checker::default();
    checker.workspace_fields(params);
    match &params.report {
        None => checker.push("report", "required field"),
        Some(report) => legacy_report(&mut checker, report),
    }
    checker.finish("create")
}

fn legacy_report(checker: &mut Checker, report: &legacy::Report) {
    if let Some(objects) = &report.objects_created {
        checker.objects_created("report.objects_created", objects);
    }
    checker.link_index(
        "report.direct_html_link_index",
        report.direct_html_link_index,
        report.html_links.as_ref().map_or(0, Vec::len),
    );
}
