//! Unified gateway error types.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level gateway error.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected before any network activity.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GatewayError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Any non-2xx response. The raw body is kept for diagnostics.
    #[error("Intersight API {method} {path} failed: {status} {status_text} - {body}")]
    Api {
        method: String,
        path: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Signing failed: {0}")]
    Signing(#[from] AuthError),
}

impl HttpError {
    /// HTTP status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Signing identity errors. All of these are configuration faults.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Private key file not found at {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("Failed to read private key at {}: {source}", path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid RSA private key: {0}")]
    InvalidKey(String),

    #[error("{0}")]
    Signing(String),
}

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
