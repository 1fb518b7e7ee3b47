//! Low-level HTTP client — `IntersightHttp`.
//!
//! Turns a logical `(method, route, body)` triple into a signed request, sends
//! it, and normalises the response. One network round trip per call, no
//! retries. Dropping the returned future cancels the in-flight request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::auth::{SignedHeaders, SigningIdentity};
use crate::error::{ConfigError, HttpError};
use crate::transport::{ApiPayload, HttpMethod, Transport};

const DIGEST: &str = "Digest";
const APPLICATION_JSON: &str = "application/json";

/// A fully signed request, ready to send.
///
/// `body` holds the exact bytes covered by the `Digest` header and the
/// signature.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub path_with_query: String,
    pub headers: SignedHeaders,
    pub body: Vec<u8>,
}

/// Signed HTTP client for the Intersight REST API.
#[derive(Clone)]
pub struct IntersightHttp {
    origin: Url,
    api_prefix: String,
    /// Shared read-only across clones and concurrent calls.
    identity: Arc<SigningIdentity>,
    client: Client,
}

impl IntersightHttp {
    pub fn new(
        base_url: &str,
        api_prefix: &str,
        identity: SigningIdentity,
    ) -> Result<Self, crate::error::GatewayError> {
        let origin = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if origin.cannot_be_a_base() || origin.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()).into());
        }

        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(HttpError::from)?;

        Ok(Self {
            origin,
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
            identity: Arc::new(identity),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.origin.as_str().trim_end_matches('/')
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Absolute path for `route`.
    ///
    /// A route starting with `/` is used as-is against the origin; anything
    /// else is joined under the API prefix.
    pub fn api_path(&self, route: &str) -> String {
        if route.starts_with('/') {
            route.to_string()
        } else {
            format!("{}/{}", self.api_prefix, route)
        }
    }

    /// Full URL for `route`, percent-encoded.
    pub fn resolve_url(&self, route: &str) -> Result<Url, HttpError> {
        let api_path = self.api_path(route);
        self.origin
            .join(&api_path)
            .map_err(|e| HttpError::InvalidRoute(format!("{}: {}", api_path, e)))
    }

    /// Build and sign a request with the current time.
    pub fn prepare(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<PreparedRequest, HttpError> {
        self.prepare_at(Utc::now(), method, route, body)
    }

    /// Build and sign a request as of `at`.
    pub fn prepare_at(
        &self,
        at: DateTime<Utc>,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<PreparedRequest, HttpError> {
        let url = self.resolve_url(route)?;
        let path_with_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let host = host_header(&url)?;

        let body = match body {
            Some(value) if !value.is_null() => serde_json::to_vec(value)
                .map_err(|e| HttpError::InvalidBody(e.to_string()))?,
            _ => Vec::new(),
        };

        let headers = self
            .identity
            .sign_at(at, method.as_str(), &path_with_query, &host, &body)?;

        Ok(PreparedRequest {
            method,
            url,
            path_with_query,
            headers,
            body,
        })
    }

    /// Send a prepared request and normalise the response.
    pub async fn send(&self, prepared: PreparedRequest) -> Result<ApiPayload, HttpError> {
        let PreparedRequest {
            method,
            url,
            path_with_query,
            headers,
            body,
        } = prepared;

        tracing::debug!(method = %method, path = %path_with_query, "Sending signed request");

        let mut req = self
            .client
            .request(reqwest_method(method), url)
            .header(AUTHORIZATION, headers.authorization)
            .header(DATE, headers.date)
            .header(DIGEST, headers.digest)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON);

        if !body.is_empty() {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        interpret(
            method,
            &path_with_query,
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            text,
        )
    }
}

#[async_trait]
impl Transport for IntersightHttp {
    async fn request(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<ApiPayload, HttpError> {
        let prepared = self.prepare(method, route, body)?;
        self.send(prepared).await
    }
}

impl std::fmt::Debug for IntersightHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersightHttp")
            .field("origin", &self.origin.as_str())
            .field("api_prefix", &self.api_prefix)
            .field("identity", &self.identity)
            .finish()
    }
}

/// Map a status and raw body onto a payload or an API error.
///
/// Any non-2xx status is a failure carrying the status, its reason phrase and
/// the body. Successful bodies that are not JSON come back as text.
pub fn interpret(
    method: HttpMethod,
    path: &str,
    status: u16,
    status_text: &str,
    text: String,
) -> Result<ApiPayload, HttpError> {
    if !(200..300).contains(&status) {
        return Err(HttpError::Api {
            method: method.as_str().to_string(),
            path: path.to_string(),
            status,
            status_text: status_text.to_string(),
            body: text,
        });
    }
    Ok(ApiPayload::from_text(text))
}

/// `host[:port]`, the port only when it is not the scheme default.
fn host_header(url: &Url) -> Result<String, HttpError> {
    let host = url
        .host_str()
        .ok_or_else(|| HttpError::InvalidRoute(format!("{} has no host", url)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
