//! JSON-RPC 2.0 framing for the tool host.
//!
//! One request per line. Requests without an `id` are notifications and get
//! no response. Tool failures are reported inside a successful result with
//! `isError: true`; only framing problems become JSON-RPC errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::server::tools::{ToolHost, ToolResult};
use crate::transport::Transport;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "intersight-gateway";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Parse and handle one line. `None` means nothing should be written back.
pub async fn handle_line<T: Transport>(host: &ToolHost<T>, line: &str) -> Option<RpcResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable request line");
            return Some(RpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
        }
    };

    let id = value.get("id").cloned();
    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return id.map(|id| RpcResponse::failure(id, INVALID_REQUEST, format!("Invalid request: {}", e)));
        }
    };

    handle_request(host, request).await
}

pub async fn handle_request<T: Transport>(host: &ToolHost<T>, request: RpcRequest) -> Option<RpcResponse> {
    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "Notification ignored");
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => RpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "tools/list" => RpcResponse::success(id, json!({ "tools": host.tools() })),
        "tools/call" => {
            let params: CallParams = match serde_json::from_value(request.params) {
                Ok(p) => p,
                Err(e) => {
                    return Some(RpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e)));
                }
            };
            let result = match host.call(&params.name, params.arguments).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(tool = %params.name, error = %e, "Tool call failed");
                    ToolResult::error(e.to_string())
                }
            };
            match serde_json::to_value(result) {
                Ok(result) => RpcResponse::success(id, result),
                Err(e) => RpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
            }
        }
        "ping" => RpcResponse::success(id, json!({})),
        other => RpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::IntersightClient;
    use crate::test_support::MockTransport;
    use crate::transport::ApiPayload;

    fn host(transport: MockTransport) -> ToolHost<MockTransport> {
        ToolHost::new(
            IntersightClient::with_transport(transport),
            "https://intersight.com",
            "/api/v1",
        )
    }

    #[tokio::test]
    async fn test_initialize() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, json!(1));
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], json!(SERVER_NAME));
        assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 7);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, "{not json").await.unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_call_with_bad_params() {
        let host = host(MockTransport::new());
        let resp = handle_line(&host, r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_in_result() {
        let host = host(MockTransport::new().fail_with(404, "Not Found"));
        let line = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"intersight.get","arguments":{"route":"ucs/Profiles/nope"}}}"#;
        let resp = handle_line(&host, line).await.unwrap();
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("404"));
    }

    #[tokio::test]
    async fn test_tool_call_success() {
        let host = host(MockTransport::new().fallback(ApiPayload::Json(json!({"Results": [{"Moid": "m"}]}))));
        let line = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"intersight.intent","arguments":{"name":"list_ucs_profiles","slots":{"top":1}}}}"#;
        let resp = handle_line(&host, line).await.unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], json!("json"));
        assert_eq!(result["content"][0]["json"]["Results"][0]["Moid"], json!("m"));
        assert_eq!(host.client().transport().calls()[0].route, "ucs/Profiles?$top=1");
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(RpcResponse::success(json!(1), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    }
}
