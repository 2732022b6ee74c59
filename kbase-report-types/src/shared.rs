//! Value records embedded by both report families.

record! {
    /// A workspace object created by an app run, with optional description
    /// text shown next to it in the report view.
    pub struct WorkspaceObject = "WorkspaceObject" {
        /// Reference in the form `workspace_id/object_id/version`.
        reference: String = "ref", with_reference;
        description: String = "description", with_description;
    }
}

record! {
    /// A file to attach to or link from a report.
    ///
    /// Callers pass either a local `path` (file or directory, uploaded by the
    /// service) or a `shock_id` for content that is already stored.
    pub struct File = "File" {
        path: String = "path", with_path;
        shock_id: String = "shock_id", with_shock_id;
        /// Plain-text filename shown to the user, e.g. `results.zip`.
        name: String = "name", with_name;
        label: String = "label", with_label;
        description: String = "description", with_description;
    }
}

record! {
    /// A file as stored inside a saved report: an uploaded handle plus the
    /// download URL.
    pub struct LinkedFile = "LinkedFile" {
        handle: String = "handle", with_handle;
        description: String = "description", with_description;
        name: String = "name", with_name;
        label: String = "label", with_label;
        url: String = "URL", with_url;
    }
}

impl File {
    /// True when the file can be located by the service.
    pub fn has_source(&self) -> bool {
        self.path.is_some() || self.shock_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire;
    use serde_json::json;

    #[test]
    fn workspace_object_uses_ref_on_the_wire() {
        let obj = WorkspaceObject::new()
            .with_reference("1/2/3")
            .with_description("assembly");
        assert_eq!(
            wire::to_value(&obj),
            json!({ "ref": "1/2/3", "description": "assembly" })
        );
    }

    #[test]
    fn linked_file_url_is_upper_case() {
        let linked: LinkedFile =
            wire::from_value(json!({ "handle": "KBH_1", "URL": "https://x/node/abc" }))
                .expect("decode");
        assert_eq!(linked.url.as_deref(), Some("https://x/node/abc"));
        assert!(linked.extensions.is_empty());
    }

    #[test]
    fn file_source_requires_path_or_shock_id() {
        assert!(!File::new().with_name("index.html").has_source());
        assert!(File::new().with_path("/kb/module/work/tmp/out").has_source());
        assert!(File::new().with_shock_id("abc-123").has_source());
    }
}
