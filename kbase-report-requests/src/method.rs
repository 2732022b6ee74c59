//! The service's callable methods.
//!
//! Each method is a zero-sized marker implementing [`Method`], binding its
//! RPC name to its parameter and result types. [`MethodKind`] is the runtime
//! counterpart used when the method is picked by name.

use std::fmt;
use std::str::FromStr;

use kbase_report_types::extended::{self, CreateExtendedReportParams, ReportInfo};
use kbase_report_types::{Record, legacy, schema, wire};
use serde_json::Value;

use crate::error::{RequestError, RequestResult, Violation};
use crate::rpc::{RPC_VERSION, RpcRequest};
use crate::validate;

/// A typed service method.
pub trait Method {
    /// Fully qualified RPC method name, e.g. `KBaseReport.create`.
    const NAME: &'static str;

    type Params: Clone + fmt::Debug;

    type Output: Record;

    /// Decode parameters from the caller's JSON payload.
    fn decode_params(payload: Value) -> RequestResult<Self::Params>;

    /// Positional parameter list for the JSON-RPC envelope.
    fn encode_params(params: &Self::Params) -> Vec<Value>;

    /// Check the rules the service enforces before saving anything.
    fn validate(params: &Self::Params) -> RequestResult<()>;
}

macro_rules! record_method {
    (
        $(#[$meta:meta])*
        $marker:ident, $rpc:literal, $params:ty => $output:ty, $validate:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $marker;

        impl Method for $marker {
            const NAME: &'static str = $rpc;
            type Params = $params;
            type Output = $output;

            fn decode_params(payload: Value) -> RequestResult<Self::Params> {
                Ok(wire::from_value(payload)?)
            }

            fn encode_params(params: &Self::Params) -> Vec<Value> {
                vec![wire::to_value(params)]
            }

            fn validate(params: &Self::Params) -> RequestResult<()> {
                $validate(params)
            }
        }
    };
}

record_method! {
    /// `create` with a [`extended::SimpleReport`].
    Create, "KBaseReport.create", extended::CreateParams => ReportInfo, validate::validate_create
}

record_method! {
    /// `create_extended_report`.
    CreateExtendedReport, "KBaseReport.create_extended_report",
    CreateExtendedReportParams => ReportInfo, validate::validate_create_extended
}

record_method! {
    /// The original `create` taking a full [`legacy::Report`].
    LegacyCreate, "KBaseReport.create", legacy::CreateParams => ReportInfo,
    validate::validate_legacy_create
}

/// `status`, which takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status;

impl Method for Status {
    const NAME: &'static str = "KBaseReport.status";
    type Params = ();
    type Output = extended::Status;

    /// Accepts `null`, `[]` or `{}`.
    fn decode_params(payload: Value) -> RequestResult<Self::Params> {
        let empty = match &payload {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            Ok(())
        } else {
            Err(RequestError::Invalid {
                violations: vec![Violation::new("params", "status takes no parameters")],
            })
        }
    }

    fn encode_params(_params: &Self::Params) -> Vec<Value> {
        Vec::new()
    }

    fn validate(_params: &Self::Params) -> RequestResult<()> {
        Ok(())
    }
}

/// A method selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Create,
    CreateExtendedReport,
    LegacyCreate,
    Status,
}

impl MethodKind {
    pub const ALL: [MethodKind; 4] = [
        MethodKind::Create,
        MethodKind::CreateExtendedReport,
        MethodKind::LegacyCreate,
        MethodKind::Status,
    ];

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            MethodKind::Create => "create",
            MethodKind::CreateExtendedReport => "create_extended_report",
            MethodKind::LegacyCreate => "legacy_create",
            MethodKind::Status => "status",
        }
    }

    pub fn rpc_name(self) -> &'static str {
        match self {
            MethodKind::Create => Create::NAME,
            MethodKind::CreateExtendedReport => CreateExtendedReport::NAME,
            MethodKind::LegacyCreate => LegacyCreate::NAME,
            MethodKind::Status => Status::NAME,
        }
    }

    /// Record type name of the parameters, `None` for `status`.
    pub fn params_type(self) -> Option<&'static str> {
        match self {
            MethodKind::Create => Some(<extended::CreateParams as Record>::TYPE_NAME),
            MethodKind::CreateExtendedReport => Some(CreateExtendedReportParams::TYPE_NAME),
            MethodKind::LegacyCreate => Some(<legacy::CreateParams as Record>::TYPE_NAME),
            MethodKind::Status => None,
        }
    }

    pub fn output_type(self) -> &'static str {
        match self {
            MethodKind::Status => <extended::Status as Record>::TYPE_NAME,
            _ => ReportInfo::TYPE_NAME,
        }
    }

    /// Decode and validate a payload, returning the canonical positional
    /// parameters.
    pub fn check(self, payload: Value) -> RequestResult<Vec<Value>> {
        self.canonical_params(payload, true)
    }

    /// Decode a payload into canonical positional parameters, optionally
    /// skipping validation.
    pub fn canonical_params(self, payload: Value, validate: bool) -> RequestResult<Vec<Value>> {
        match self {
            MethodKind::Create => canonical_as::<Create>(payload, validate),
            MethodKind::CreateExtendedReport => {
                canonical_as::<CreateExtendedReport>(payload, validate)
            }
            MethodKind::LegacyCreate => canonical_as::<LegacyCreate>(payload, validate),
            MethodKind::Status => canonical_as::<Status>(payload, validate),
        }
    }

    /// Wrap a payload in a request envelope.
    pub fn envelope(
        self,
        payload: Value,
        id: impl Into<String>,
        validate: bool,
    ) -> RequestResult<RpcRequest> {
        Ok(RpcRequest {
            version: RPC_VERSION.to_string(),
            method: self.rpc_name().to_string(),
            params: self.canonical_params(payload, validate)?,
            id: id.into(),
        })
    }
}

fn canonical_as<M: Method>(payload: Value, validate: bool) -> RequestResult<Vec<Value>> {
    let params = M::decode_params(payload)?;
    if validate {
        M::validate(&params)?;
    }
    Ok(M::encode_params(&params))
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = RequestError;

    /// Accepts the short name or the qualified RPC name. The qualified
    /// `KBaseReport.create` resolves to the current [`MethodKind::Create`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s
            .strip_prefix(schema::SERVICE_NAME)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);
        MethodKind::ALL
            .into_iter()
            .find(|kind| kind.name() == short)
            .ok_or_else(|| RequestError::UnknownMethod(s.to_string()))
    }
}
