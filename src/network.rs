//! Network defaults for the Intersight API.

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://intersight.com";

/// Default API path prefix, joined in front of relative routes.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
