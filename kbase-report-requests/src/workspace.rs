//! Workspace addressing for report requests.

use kbase_report_types::{extended, legacy};
use serde_json::Value;

use crate::error::RequestError;

/// Where the service should save a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceTarget {
    Name(String),
    Id(i64),
}

impl WorkspaceTarget {
    /// Resolve from the two optional request fields. Exactly one must be set.
    pub fn from_parts(name: Option<&str>, id: Option<i64>) -> Result<Self, RequestError> {
        match (name, id) {
            (Some(name), None) => Ok(WorkspaceTarget::Name(name.to_string())),
            (None, Some(id)) => Ok(WorkspaceTarget::Id(id)),
            (None, None) => Err(RequestError::MissingRequiredContext {
                message: "one of workspace_name or workspace_id is required".to_string(),
            }),
            (Some(_), Some(_)) => Err(RequestError::MissingRequiredContext {
                message: "supply exactly one of workspace_name or workspace_id, not both"
                    .to_string(),
            }),
        }
    }

    /// Key and value identifying the workspace in a `save_objects` call.
    pub fn save_field(&self) -> (&'static str, Value) {
        match self {
            WorkspaceTarget::Name(name) => ("workspace", Value::String(name.clone())),
            WorkspaceTarget::Id(id) => ("id", Value::from(*id)),
        }
    }
}

/// Request parameters that name a target workspace.
pub trait WorkspaceScoped {
    fn workspace_name(&self) -> Option<&str>;

    fn workspace_id(&self) -> Option<i64>;

    fn workspace_target(&self) -> Result<WorkspaceTarget, RequestError> {
        WorkspaceTarget::from_parts(self.workspace_name(), self.workspace_id())
    }
}

macro_rules! scoped_by_name_and_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WorkspaceScoped for $ty {
                fn workspace_name(&self) -> Option<&str> {
                    self.workspace_name.as_deref()
                }

                fn workspace_id(&self) -> Option<i64> {
                    self.workspace_id
                }
            }
        )*
    };
}

scoped_by_name_and_id!(
    extended::CreateParams,
    extended::CreateExtendedReportParams,
    legacy::CreateParams,
);

impl WorkspaceScoped for legacy::CreateReportParams {
    fn workspace_name(&self) -> Option<&str> {
        self.workspace_name.as_deref()
    }

    fn workspace_id(&self) -> Option<i64> {
        None
    }
}
