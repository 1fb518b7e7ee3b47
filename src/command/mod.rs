//! Commands — declarative `{name, parameters}` requests and their typed form.
//!
//! A raw [`Command`] is validated into an [`Intent`] before anything touches
//! the network. Unknown names and missing identifiers are rejected here.

pub mod client;
pub mod dispatch;
pub mod route;

pub use dispatch::{dispatch, ConfirmationPrompt, ConfirmationStep, DispatchOutcome};
pub use route::{build_call, BuiltCall};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// Literal the caller must echo back in `confirm` to authorise a delete.
pub const CONFIRM_TOKEN: &str = "DELETE";

/// Default page size for listing commands.
pub const DEFAULT_LIST_TOP: u32 = 20;

/// Caller input. `parameters` is also accepted under the key `slots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default, alias = "slots")]
    pub parameters: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }
}

/// Paging and filtering for listing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub top: u32,
    /// Raw OData filter expression, encoded when the route is built.
    pub filter: Option<String>,
}

/// Parameters of a profile delete, before and after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub moid: Option<String>,
    pub name: Option<String>,
    pub org: Option<String>,
    pub confirm: Option<String>,
}

impl DeleteRequest {
    /// True only for the exact confirmation literal.
    pub fn is_confirmed(&self) -> bool {
        self.confirm.as_deref() == Some(CONFIRM_TOKEN)
    }
}

/// A validated command.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ListPhysicalServers(ListQuery),
    GetServerByMoid { moid: String },
    ListUcsProfiles(ListQuery),
    PatchUcsProfile { moid: String, body: Option<Value> },
    CreateUcsPool { payload: Option<Value> },
    DeleteUcsProfile(DeleteRequest),
    ResolveProfileByName { name: String, org: Option<String> },
}

impl Intent {
    pub fn parse(command: &Command) -> Result<Self, GatewayError> {
        let params = Params(&command.parameters);

        let intent = match command.name.as_str() {
            "list_physical_servers" => Self::ListPhysicalServers(params.list_query()?),
            "get_server_by_moid" => Self::GetServerByMoid {
                moid: params.required_str("moid")?,
            },
            "list_ucs_profiles" => Self::ListUcsProfiles(params.list_query()?),
            "patch_ucs_profile" => Self::PatchUcsProfile {
                moid: params.required_str("moid")?,
                body: params.value("body").or_else(|| params.value("patch_ops")),
            },
            "create_ucs_pool" => Self::CreateUcsPool {
                payload: params.value("payload"),
            },
            "delete_ucs_profile" => {
                let request = DeleteRequest {
                    moid: params.optional_str("moid")?,
                    name: params.optional_str("name")?,
                    org: params.optional_str("org")?,
                    confirm: params.0.get("confirm").and_then(Value::as_str).map(str::to_string),
                };
                if request.moid.is_none() && request.name.is_none() {
                    return Err(GatewayError::validation("Missing moid or name"));
                }
                Self::DeleteUcsProfile(request)
            }
            "resolve_profile_by_name" => Self::ResolveProfileByName {
                name: params.required_str("name")?,
                org: params.optional_str("org")?,
            },
            other => {
                return Err(GatewayError::validation(format!("Unknown intent: {}", other)));
            }
        };
        Ok(intent)
    }

    /// Command name this intent was parsed from.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListPhysicalServers(_) => "list_physical_servers",
            Self::GetServerByMoid { .. } => "get_server_by_moid",
            Self::ListUcsProfiles(_) => "list_ucs_profiles",
            Self::PatchUcsProfile { .. } => "patch_ucs_profile",
            Self::CreateUcsPool { .. } => "create_ucs_pool",
            Self::DeleteUcsProfile(_) => "delete_ucs_profile",
            Self::ResolveProfileByName { .. } => "resolve_profile_by_name",
        }
    }
}

impl TryFrom<&Command> for Intent {
    type Error = GatewayError;

    fn try_from(command: &Command) -> Result<Self, Self::Error> {
        Self::parse(command)
    }
}

/// Typed accessors over the raw parameter map. JSON `null` counts as absent.
struct Params<'a>(&'a Map<String, Value>);

impl Params<'_> {
    fn value(&self, key: &str) -> Option<Value> {
        self.0.get(key).filter(|v| !v.is_null()).cloned()
    }

    fn optional_str(&self, key: &str) -> Result<Option<String>, GatewayError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(GatewayError::validation(format!("`{}` must be a string", key))),
        }
    }

    fn required_str(&self, key: &str) -> Result<String, GatewayError> {
        self.optional_str(key)?
            .ok_or_else(|| GatewayError::validation(format!("Missing {}", key)))
    }

    fn top(&self) -> Result<u32, GatewayError> {
        let invalid = || GatewayError::validation("`top` must be a non-negative integer");
        match self.0.get("top") {
            None | Some(Value::Null) => Ok(DEFAULT_LIST_TOP),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    fn list_query(&self) -> Result<ListQuery, GatewayError> {
        Ok(ListQuery {
            top: self.top()?,
            filter: self.optional_str("filter")?,
        })
    }
}
