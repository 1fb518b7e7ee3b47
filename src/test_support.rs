//! Shared fixtures for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::SigningIdentity;
use crate::error::HttpError;
use crate::transport::{ApiPayload, HttpMethod, Transport};

pub(crate) const TEST_KEY_PEM: &str = include_str!("../tests/fixtures/test_rsa_key.pem");

pub(crate) fn test_identity() -> SigningIdentity {
    SigningIdentity::from_pem("test-key-id", TEST_KEY_PEM).expect("fixture key parses")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: HttpMethod,
    pub route: String,
    pub body: Option<Value>,
}

/// In-memory transport that records every call.
///
/// Responses are picked by the first rule whose needle is contained in the
/// route, else the fallback.
pub(crate) struct MockTransport {
    rules: Vec<(String, ApiPayload)>,
    fallback: ApiPayload,
    failure: Option<(u16, String)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: ApiPayload::Json(Value::Object(Default::default())),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, route_contains: &str, payload: ApiPayload) -> Self {
        self.rules.push((route_contains.to_string(), payload));
        self
    }

    pub fn fallback(mut self, payload: ApiPayload) -> Self {
        self.fallback = payload;
        self
    }

    /// Fail every call with the given status.
    pub fn fail_with(mut self, status: u16, status_text: &str) -> Self {
        self.failure = Some((status, status_text.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<ApiPayload, HttpError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            route: route.to_string(),
            body: body.cloned(),
        });

        if let Some((status, status_text)) = &self.failure {
            return Err(HttpError::Api {
                method: method.as_str().to_string(),
                path: route.to_string(),
                status: *status,
                status_text: status_text.clone(),
                body: r#"{"message":"mock failure"}"#.to_string(),
            });
        }

        let payload = self
            .rules
            .iter()
            .find(|(needle, _)| route.contains(needle.as_str()))
            .map(|(_, payload)| payload.clone())
            .unwrap_or_else(|| self.fallback.clone());
        Ok(payload)
    }
}
