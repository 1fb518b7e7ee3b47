//! Profiles sub-client — MOID resolution by name.

use crate::client::IntersightClient;
use crate::domain::profile::wire::normalize_matches;
use crate::domain::profile::{ResolveOptions, ResolveResult};
use crate::error::GatewayError;
use crate::transport::Transport;

pub struct Profiles<'a, T> {
    pub(crate) client: &'a IntersightClient<T>,
}

impl<'a, T: Transport> Profiles<'a, T> {
    /// Resolve a profile MOID by exact name, optionally scoped to an organization.
    pub async fn resolve(&self, name: &str, org: Option<&str>) -> Result<ResolveResult, GatewayError> {
        let mut options = ResolveOptions::new(name);
        options.org = org.map(str::to_string);
        resolve_profile(self.client.transport(), &options).await
    }

    /// Resolve with full control over the query.
    pub async fn resolve_with(&self, options: &ResolveOptions) -> Result<ResolveResult, GatewayError> {
        resolve_profile(self.client.transport(), options).await
    }
}

/// Issue one filtered listing and disambiguate the result set.
pub async fn resolve_profile<T: Transport + ?Sized>(
    transport: &T,
    options: &ResolveOptions,
) -> Result<ResolveResult, GatewayError> {
    if options.name.is_empty() {
        return Err(GatewayError::validation("Missing profile name"));
    }

    let payload = transport.get(&options.route()).await?;
    let result = ResolveResult::from_matches(options.name.clone(), normalize_matches(&payload));

    tracing::debug!(
        name = %options.name,
        org = ?options.org,
        matches = result.matches.len(),
        "Resolved profile name"
    );
    Ok(result)
}
