//! Tool catalogue exposed to the host: raw verbs, the resolver and the command router.
//!
//! Every DELETE is irreversible, so the raw `intersight.delete` tool carries the
//! same `confirm: "DELETE"` gate as the `delete_ucs_profile` command.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::IntersightClient;
use crate::command::{Command, ConfirmationPrompt, DispatchOutcome, CONFIRM_TOKEN};
use crate::error::GatewayError;
use crate::transport::Transport;

pub const TOOL_GET: &str = "intersight.get";
pub const TOOL_POST: &str = "intersight.post";
pub const TOOL_PATCH: &str = "intersight.patch";
pub const TOOL_DELETE: &str = "intersight.delete";
pub const TOOL_RESOLVE_PROFILE: &str = "intersight.resolve_profile";
pub const TOOL_INTENT: &str = "intersight.intent";
pub const TOOL_PING: &str = "intersight.ping";

/// Acknowledgement text for an executed delete.
pub const DELETED_ACK: &str = "deleted";

/// Tool listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Json { json: Value },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn json(json: Value) -> Self {
        Self {
            content: vec![ToolContent::Json { json }],
            is_error: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(message)
        }
    }

    pub fn from_outcome(outcome: DispatchOutcome) -> Result<Self, GatewayError> {
        Ok(match outcome {
            DispatchOutcome::Payload(payload) => Self::json(payload.into_value()),
            DispatchOutcome::Deleted => Self::text(DELETED_ACK),
            DispatchOutcome::Resolved(result) => Self::json(serde_json::to_value(result)?),
            DispatchOutcome::NeedsConfirmation(prompt) => Self::json(serde_json::to_value(prompt)?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteArgs {
    route: String,
}

#[derive(Debug, Deserialize)]
struct BodyArgs {
    route: String,
    body: Value,
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    route: String,
    #[serde(default)]
    confirm: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResolveArgs {
    name: String,
    #[serde(default)]
    org: Option<String>,
}

/// Executes tool calls against one client.
pub struct ToolHost<T> {
    client: IntersightClient<T>,
    base_url: String,
    api_prefix: String,
}

impl<T: Transport> ToolHost<T> {
    /// `base_url` and `api_prefix` are what `intersight.ping` reports.
    pub fn new(client: IntersightClient<T>, base_url: &str, api_prefix: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_prefix: api_prefix.to_string(),
        }
    }

    pub fn client(&self) -> &IntersightClient<T> {
        &self.client
    }

    pub fn tools(&self) -> Vec<ToolDescriptor> {
        tool_catalogue()
    }

    /// Run one tool. Errors are returned, not folded into the result.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolResult, GatewayError> {
        let transport = self.client.transport();
        match name {
            TOOL_GET => {
                let args: RouteArgs = parse_args(name, arguments)?;
                Ok(ToolResult::json(transport.get(&args.route).await?.into_value()))
            }
            TOOL_POST => {
                let args: BodyArgs = parse_args(name, arguments)?;
                let payload = transport.post(&args.route, Some(&args.body)).await?;
                Ok(ToolResult::json(payload.into_value()))
            }
            TOOL_PATCH => {
                let args: BodyArgs = parse_args(name, arguments)?;
                let payload = transport.patch(&args.route, Some(&args.body)).await?;
                Ok(ToolResult::json(payload.into_value()))
            }
            TOOL_DELETE => {
                let args: DeleteArgs = parse_args(name, arguments)?;
                if args.confirm.as_ref().and_then(Value::as_str) != Some(CONFIRM_TOKEN) {
                    tracing::info!(route = %args.route, "Raw delete awaiting confirmation");
                    let prompt = ConfirmationPrompt::confirm_route(args.route);
                    return Ok(ToolResult::json(serde_json::to_value(prompt)?));
                }
                transport.delete(&args.route).await?;
                tracing::info!(route = %args.route, "Deleted");
                Ok(ToolResult::text(DELETED_ACK))
            }
            TOOL_RESOLVE_PROFILE => {
                let args: ResolveArgs = parse_args(name, arguments)?;
                let result = self
                    .client
                    .profiles()
                    .resolve(&args.name, args.org.as_deref())
                    .await?;
                Ok(ToolResult::json(serde_json::to_value(result)?))
            }
            TOOL_INTENT => {
                let command: Command = parse_args(name, arguments)?;
                let outcome = self.client.commands().dispatch(command).await?;
                ToolResult::from_outcome(outcome)
            }
            TOOL_PING => Ok(ToolResult::json(json!({
                "baseUrl": self.base_url,
                "apiPrefix": self.api_prefix,
            }))),
            other => Err(GatewayError::validation(format!("Unknown tool: {}", other))),
        }
    }
}

#[cfg(feature = "http")]
impl ToolHost<crate::http::IntersightHttp> {
    pub fn from_client(client: IntersightClient<crate::http::IntersightHttp>) -> Self {
        let base_url = client.base_url().to_string();
        let api_prefix = client.api_prefix().to_string();
        Self {
            client,
            base_url,
            api_prefix,
        }
    }
}

fn parse_args<A: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<A, GatewayError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| GatewayError::validation(format!("Invalid arguments for {}: {}", tool, e)))
}

fn tool_catalogue() -> Vec<ToolDescriptor> {
    let route_only = json!({
        "type": "object",
        "required": ["route"],
        "properties": { "route": { "type": "string" } }
    });
    let route_and_body = json!({
        "type": "object",
        "required": ["route", "body"],
        "properties": { "route": { "type": "string" }, "body": { "type": "object" } }
    });

    vec![
        ToolDescriptor {
            name: TOOL_GET,
            description: "GET from Cisco Intersight. Input: { route: string }",
            input_schema: route_only,
        },
        ToolDescriptor {
            name: TOOL_POST,
            description: "POST to Cisco Intersight. Input: { route: string, body: object }",
            input_schema: route_and_body.clone(),
        },
        ToolDescriptor {
            name: TOOL_PATCH,
            description: "PATCH to Cisco Intersight. Input: { route: string, body: object }",
            input_schema: route_and_body,
        },
        ToolDescriptor {
            name: TOOL_DELETE,
            description: "DELETE resource in Cisco Intersight. Requires confirm: \"DELETE\". \
                          Input: { route: string, confirm?: string }",
            input_schema: json!({
                "type": "object",
                "required": ["route"],
                "properties": { "route": { "type": "string" }, "confirm": { "type": "string" } }
            }),
        },
        ToolDescriptor {
            name: TOOL_RESOLVE_PROFILE,
            description: "Resolve a UCS Profile MOID by name (and optional org). \
                          Input: { name: string, org?: string }",
            input_schema: json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" }, "org": { "type": "string" } }
            }),
        },
        ToolDescriptor {
            name: TOOL_INTENT,
            description: "Route a high-level intent. Supports safe delete. \
                          Input: { name: string, slots?: object }",
            input_schema: json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" }, "slots": { "type": "object" } }
            }),
        },
        ToolDescriptor {
            name: TOOL_PING,
            description: "Ping the server and return base URL/prefix.",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}
