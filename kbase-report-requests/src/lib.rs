//! Caller-side preparation of KBaseReport service calls.
//!
//! This crate sits between the wire records of `kbase-report-types` and
//! whatever transport a caller uses. It does no I/O: it validates request
//! parameters the way the service would, wraps them in JSON-RPC 1.1
//! envelopes, unwraps replies, and builds the report object the service
//! saves.

pub mod error;
pub mod method;
pub mod rpc;
pub mod save;
pub mod validate;
pub mod workspace;

pub use error::{RequestError, RequestResult, Violation};
pub use method::{Create, CreateExtendedReport, LegacyCreate, Method, MethodKind, Status};
pub use rpc::{RpcError, RpcReply, RpcRequest, decode_reply, encode_call, prepare_call};
pub use save::{
    SaveObjectsParams, UploadedHandle, generate_report_name, linked_file_from, object_ref,
    report_info_from_object_info, report_name, saved_report_from_extended,
    saved_report_from_simple,
};
pub use workspace::{WorkspaceScoped, WorkspaceTarget};
