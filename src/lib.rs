//! # Intersight Gateway
//!
//! Signed access to the Cisco Intersight management API, a name → MOID
//! resolver for UCS profiles, and a command dispatcher that refuses to delete
//! anything without an explicit confirmation round-trip.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Errors, configuration, request signing (always available)
//! 2. **Transport** — The `Transport` seam and `IntersightHttp`, its signed reqwest implementation
//! 3. **Domain** — UCS profile resolution
//! 4. **Commands** — Intent validation, the route table, the delete confirmation gate
//! 5. **High-Level Client** — `IntersightClient` with nested sub-clients
//! 6. **Tool Host** — JSON-RPC line protocol over stdio
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use intersight_gateway::prelude::*;
//!
//! let client = IntersightClient::from_config(&GatewayConfig::from_env()?)?;
//!
//! let resolved = client.profiles().resolve("LabProfile", None).await?;
//! let outcome = client
//!     .commands()
//!     .dispatch(Command::new("delete_ucs_profile").with("name", "LabProfile"))
//!     .await?;
//! assert!(outcome.needs_confirmation());
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Unified error types.
pub mod error;

/// Default endpoint constants.
pub mod network;

/// Environment-driven configuration.
pub mod config;

/// Request signing: digest, canonical string, RSA-SHA256 signature.
pub mod auth;

// ── Layer 2: Transport ───────────────────────────────────────────────────────

/// The `Transport` trait and payload types.
pub mod transport;

/// Signed HTTP transport.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: Domain ──────────────────────────────────────────────────────────

/// Domain modules (vertical slices): types, wire types, sub-clients.
pub mod domain;

// ── Layer 4: Commands ────────────────────────────────────────────────────────

/// Command validation, routing and dispatch.
pub mod command;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `IntersightClient` — the primary entry point.
pub mod client;

// ── Layer 6: Tool Host ───────────────────────────────────────────────────────

/// Tool catalogue and JSON-RPC framing.
pub mod server;

#[cfg(test)]
mod test_support;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Errors
    pub use crate::error::{AuthError, ConfigError, GatewayError, HttpError};

    // Configuration + network
    pub use crate::config::GatewayConfig;
    pub use crate::network::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};

    // Signing
    pub use crate::auth::{SignedHeaders, SigningIdentity};

    // Transport
    pub use crate::transport::{ApiPayload, HttpMethod, Transport};
    #[cfg(feature = "http")]
    pub use crate::http::IntersightHttp;

    // Domain types — profiles
    pub use crate::domain::profile::{ProfileMatch, ResolveOptions, ResolveResult};

    // Commands
    pub use crate::command::{
        Command, ConfirmationPrompt, ConfirmationStep, DispatchOutcome, Intent, CONFIRM_TOKEN,
    };

    // Client + sub-clients
    pub use crate::client::{CommandsClient, IntersightClient, ProfilesClient};
    #[cfg(feature = "http")]
    pub use crate::client::IntersightClientBuilder;

    // Tool host
    pub use crate::server::{ToolHost, ToolResult};
}
