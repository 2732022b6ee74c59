//! JSON-RPC 1.1 envelopes as spoken by the service.
//!
//! Parameters travel as a positional array and results come back wrapped in
//! a one-element array. Errors carry the service's exception name, a code,
//! a message and optionally a server-side trace in `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use kbase_report_types::wire;

use crate::error::{RequestError, RequestResult};
use crate::method::Method;

pub const RPC_VERSION: &str = "1.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub version: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RpcError> for RequestError {
    fn from(err: RpcError) -> Self {
        RequestError::Remote {
            name: err.name,
            code: err.code,
            message: err.message,
            detail: err.error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Build the request envelope for already-validated parameters.
pub fn encode_call<M: Method>(params: &M::Params, id: impl Into<String>) -> RpcRequest {
    RpcRequest {
        version: RPC_VERSION.to_string(),
        method: M::NAME.to_string(),
        params: M::encode_params(params),
        id: id.into(),
    }
}

/// Validate and then build the request envelope.
pub fn prepare_call<M: Method>(
    params: &M::Params,
    id: impl Into<String>,
) -> RequestResult<RpcRequest> {
    M::validate(params)?;
    let request = encode_call::<M>(params, id);
    debug!(method = M::NAME, id = %request.id, "prepared call");
    Ok(request)
}

/// Decode a reply body into the method's result record.
pub fn decode_reply<M: Method>(body: &str) -> RequestResult<M::Output> {
    let reply: RpcReply = serde_json::from_str(body)
        .map_err(|err| RequestError::MalformedReply(err.to_string()))?;
    decode_reply_value::<M>(reply)
}

pub fn decode_reply_value<M: Method>(reply: RpcReply) -> RequestResult<M::Output> {
    if let Some(error) = reply.error {
        warn!(method = M::NAME, name = %error.name, code = error.code, "service returned an error");
        return Err(error.into());
    }
    match reply.result {
        Some(Value::Array(mut items)) if !items.is_empty() => {
            let first = items.swap_remove(0);
            Ok(wire::from_value(first)?)
        }
        Some(Value::Array(_)) => Err(RequestError::MalformedReply(
            "result array is empty".to_string(),
        )),
        Some(_) => Err(RequestError::MalformedReply(
            "result is not an array".to_string(),
        )),
        None => Err(RequestError::MalformedReply(
            "reply has neither result nor error".to_string(),
        )),
    }
}
