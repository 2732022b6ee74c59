//! Records of the current report API: `create` with a [`SimpleReport`],
//! `create_extended_report`, and the values both return.

use crate::shared::{File, WorkspaceObject};

record! {
    /// A simple report for use in `create()`.
    pub struct SimpleReport = "SimpleReport" {
        text_message: String = "text_message", with_text_message;
        warnings: Vec<String> = "warnings", with_warnings;
        direct_html: String = "direct_html", with_direct_html;
    }
}

record! {
    /// Parameters for `create()`.
    ///
    /// Pass either `workspace_name` or `workspace_id`; the id is preferred
    /// since names can change.
    pub struct CreateParams = "CreateParams" {
        report: SimpleReport = "report", with_report;
        workspace_name: String = "workspace_name", with_workspace_name;
        workspace_id: i64 = "workspace_id", with_workspace_id;
    }
}

record! {
    /// Parameters for a report with file links, HTML links and sizing hints.
    ///
    /// Every field is optional. Set either `direct_html` or `html_links`
    /// (with `direct_html_link_index`), not both.
    pub struct CreateExtendedReportParams = "CreateExtendedReportParams" {
        message: String = "message", with_message;
        objects_created: Vec<WorkspaceObject> = "objects_created", with_objects_created;
        warnings: Vec<String> = "warnings", with_warnings;
        /// Paths or shock ids of HTML files or directories. Paths are zipped
        /// and uploaded by the service.
        html_links: Vec<File> = "html_links", with_html_links;
        direct_html: String = "direct_html", with_direct_html;
        direct_html_link_index: i64 = "direct_html_link_index", with_direct_html_link_index;
        file_links: Vec<File> = "file_links", with_file_links;
        /// Name for the saved object; generated when unset.
        report_object_name: String = "report_object_name", with_report_object_name;
        /// Fixed height in pixels of the HTML window.
        html_window_height: f64 = "html_window_height", with_html_window_height;
        /// Fixed height in pixels of the summary window.
        summary_window_height: f64 = "summary_window_height", with_summary_window_height;
        workspace_name: String = "workspace_name", with_workspace_name;
        workspace_id: i64 = "workspace_id", with_workspace_id;
    }
}

record! {
    /// Reference to a saved report, returned by both create methods.
    pub struct ReportInfo = "ReportInfo" {
        reference: String = "ref", with_reference;
        name: String = "name", with_name;
    }
}

record! {
    /// Service health returned by `status`.
    pub struct Status = "Status" {
        state: String = "state", with_state;
        message: String = "message", with_message;
        version: String = "version", with_version;
        git_url: String = "git_url", with_git_url;
        git_commit_hash: String = "git_commit_hash", with_git_commit_hash;
    }
}
