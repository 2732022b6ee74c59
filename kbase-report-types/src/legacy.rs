//! Records of the original report module: the full saved `Report` and the
//! parameters of its `create` method.

use crate::shared::{LinkedFile, WorkspaceObject};

record! {
    /// A saved report object.
    pub struct Report = "Report" {
        text_message: String = "text_message", with_text_message;
        warnings: Vec<String> = "warnings", with_warnings;
        objects_created: Vec<WorkspaceObject> = "objects_created", with_objects_created;
        file_links: Vec<LinkedFile> = "file_links", with_file_links;
        html_links: Vec<LinkedFile> = "html_links", with_html_links;
        direct_html: String = "direct_html", with_direct_html;
        /// Index into `html_links` of the page shown by default.
        direct_html_link_index: i64 = "direct_html_link_index", with_direct_html_link_index;
    }
}

record! {
    /// Parameters for `create`.
    ///
    /// Callers supply exactly one of `workspace_name` or `workspace_id`;
    /// the record itself accepts either, both or neither.
    pub struct CreateParams = "CreateParams" {
        report: Report = "report", with_report;
        workspace_name: String = "workspace_name", with_workspace_name;
        workspace_id: i64 = "workspace_id", with_workspace_id;
    }
}

record! {
    /// Narrower `create` parameters addressing the workspace by name only.
    pub struct CreateReportParams = "CreateReportParams" {
        report: Report = "report", with_report;
        workspace_name: String = "workspace_name", with_workspace_name;
    }
}
