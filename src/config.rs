//! Startup configuration.
//!
//! Values come from `INTERSIGHT_*` environment variables. The binary loads a
//! `.env` file before reading them and lets command-line flags override.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::network::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};

pub const ENV_BASE_URL: &str = "INTERSIGHT_BASE_URL";
pub const ENV_API_PREFIX: &str = "INTERSIGHT_API_PREFIX";
pub const ENV_API_KEY_ID: &str = "INTERSIGHT_API_KEY_ID";
pub const ENV_PRIVATE_KEY_PATH: &str = "INTERSIGHT_PRIVATE_KEY_PATH";

/// Connection and signing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Origin, e.g. `https://intersight.com`.
    pub base_url: String,
    /// Prefix for relative routes, e.g. `/api/v1`.
    pub api_prefix: String,
    pub api_key_id: String,
    pub private_key_path: PathBuf,
}

impl GatewayConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key_id = non_empty(ENV_API_KEY_ID).ok_or(ConfigError::MissingVar(ENV_API_KEY_ID))?;
        let private_key_path = non_empty(ENV_PRIVATE_KEY_PATH)
            .ok_or(ConfigError::MissingVar(ENV_PRIVATE_KEY_PATH))?;

        Ok(Self {
            base_url: non_empty(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_prefix: non_empty(ENV_API_PREFIX).unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            api_key_id,
            private_key_path: PathBuf::from(private_key_path),
        })
    }
}
