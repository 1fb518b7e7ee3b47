//! High-level client — `IntersightClient` with nested sub-client accessors.
//!
//! Each slice has its own sub-client: `client.profiles()` for name
//! resolution, `client.commands()` for command dispatch. This module keeps the
//! builder and the accessor methods.

use crate::transport::Transport;

pub use crate::command::client::Commands as CommandsClient;
pub use crate::domain::profile::client::Profiles as ProfilesClient;

use crate::command::client::Commands;
use crate::domain::profile::client::Profiles;

/// The primary entry point.
///
/// Generic over its [`Transport`]; production code uses
/// [`IntersightHttp`](crate::http::IntersightHttp) via
/// [`IntersightClient::builder`].
#[derive(Debug)]
pub struct IntersightClient<T> {
    pub(crate) transport: T,
}

impl<T: Transport> IntersightClient<T> {
    /// Wrap an existing transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn profiles(&self) -> Profiles<'_, T> {
        Profiles { client: self }
    }

    pub fn commands(&self) -> Commands<'_, T> {
        Commands { client: self }
    }
}

impl<T: Clone> Clone for IntersightClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

#[cfg(feature = "http")]
pub use builder::IntersightClientBuilder;

#[cfg(feature = "http")]
mod builder {
    use std::path::PathBuf;

    use super::IntersightClient;
    use crate::auth::SigningIdentity;
    use crate::config::{GatewayConfig, ENV_API_KEY_ID, ENV_PRIVATE_KEY_PATH};
    use crate::error::{ConfigError, GatewayError};
    use crate::http::IntersightHttp;
    use crate::network::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};

    impl IntersightClient<IntersightHttp> {
        pub fn builder() -> IntersightClientBuilder {
            IntersightClientBuilder::default()
        }

        /// Build directly from a loaded configuration.
        pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
            IntersightClientBuilder::from_config(config).build()
        }

        pub fn base_url(&self) -> &str {
            self.transport.base_url()
        }

        pub fn api_prefix(&self) -> &str {
            self.transport.api_prefix()
        }
    }

    // ═════════════════════════════════════════════════════════════════════
    // Builder
    // ═════════════════════════════════════════════════════════════════════

    #[derive(Debug, Clone)]
    enum KeySource {
        Path(PathBuf),
        Pem(String),
    }

    #[derive(Debug, Clone)]
    pub struct IntersightClientBuilder {
        base_url: String,
        api_prefix: String,
        api_key_id: Option<String>,
        private_key: Option<KeySource>,
    }

    impl Default for IntersightClientBuilder {
        fn default() -> Self {
            Self {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_prefix: DEFAULT_API_PREFIX.to_string(),
                api_key_id: None,
                private_key: None,
            }
        }
    }

    impl IntersightClientBuilder {
        pub fn from_config(config: &GatewayConfig) -> Self {
            Self::default()
                .base_url(&config.base_url)
                .api_prefix(&config.api_prefix)
                .api_key_id(&config.api_key_id)
                .private_key_path(config.private_key_path.clone())
        }

        pub fn base_url(mut self, url: &str) -> Self {
            self.base_url = url.to_string();
            self
        }

        pub fn api_prefix(mut self, prefix: &str) -> Self {
            self.api_prefix = prefix.to_string();
            self
        }

        pub fn api_key_id(mut self, key_id: &str) -> Self {
            self.api_key_id = Some(key_id.to_string());
            self
        }

        /// Load the RSA private key from this file at build time.
        pub fn private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
            self.private_key = Some(KeySource::Path(path.into()));
            self
        }

        /// Use PEM text directly instead of a file.
        pub fn private_key_pem(mut self, pem: impl Into<String>) -> Self {
            self.private_key = Some(KeySource::Pem(pem.into()));
            self
        }

        /// Load the signing key and build the client. Key problems are fatal here.
        pub fn build(self) -> Result<IntersightClient<IntersightHttp>, GatewayError> {
            let key_id = self
                .api_key_id
                .ok_or(ConfigError::MissingVar(ENV_API_KEY_ID))?;
            let identity = match self.private_key {
                Some(KeySource::Path(path)) => SigningIdentity::load(key_id, path)?,
                Some(KeySource::Pem(pem)) => SigningIdentity::from_pem(key_id, &pem)?,
                None => return Err(ConfigError::MissingVar(ENV_PRIVATE_KEY_PATH).into()),
            };

            Ok(IntersightClient {
                transport: IntersightHttp::new(&self.base_url, &self.api_prefix, identity)?,
            })
        }
    }

}
