//! Transport seam — the four verbs the command layer needs.
//!
//! [`IntersightHttp`](crate::http::IntersightHttp) is the signed, networked
//! implementation. Anything else implementing [`Transport`] (an in-memory fake
//! in tests, a proxy) can stand in for it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HttpError;

/// HTTP verbs issued against the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A successful response body.
///
/// JSON when the body parses, otherwise the raw text (possibly empty). A body
/// that fails to parse is never discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiPayload {
    Json(Value),
    Text(String),
}

impl ApiPayload {
    /// Classify a raw response body.
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return Self::Text(text);
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Convert into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// One outbound call per invocation, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method` against `route`. A `None` or JSON `null` body sends no body.
    async fn request(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<ApiPayload, HttpError>;

    async fn get(&self, route: &str) -> Result<ApiPayload, HttpError> {
        self.request(HttpMethod::Get, route, None).await
    }

    async fn post(&self, route: &str, body: Option<&Value>) -> Result<ApiPayload, HttpError> {
        self.request(HttpMethod::Post, route, body).await
    }

    async fn patch(&self, route: &str, body: Option<&Value>) -> Result<ApiPayload, HttpError> {
        self.request(HttpMethod::Patch, route, body).await
    }

    async fn delete(&self, route: &str) -> Result<ApiPayload, HttpError> {
        self.request(HttpMethod::Delete, route, None).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<ApiPayload, HttpError> {
        (**self).request(method, route, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_json() {
        let payload = ApiPayload::from_text(r#"{"Results":[]}"#.to_string());
        assert_eq!(payload, ApiPayload::Json(json!({"Results": []})));
    }

    #[test]
    fn test_payload_keeps_non_json_text() {
        let payload = ApiPayload::from_text("<html>maintenance</html>".to_string());
        assert_eq!(payload, ApiPayload::Text("<html>maintenance</html>".to_string()));
    }

    #[test]
    fn test_payload_empty_body() {
        assert_eq!(ApiPayload::from_text(String::new()), ApiPayload::Text(String::new()));
    }

    #[test]
    fn test_payload_serializes_untagged() {
        let json_payload = serde_json::to_value(ApiPayload::Json(json!({"a": 1}))).unwrap();
        assert_eq!(json_payload, json!({"a": 1}));
        let text_payload = serde_json::to_value(ApiPayload::Text("ok".into())).unwrap();
        assert_eq!(text_payload, json!("ok"));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
