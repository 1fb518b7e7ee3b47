//! UCS profile domain — name → MOID resolution.
//!
//! Ambiguity is never resolved silently: a result carries a MOID only when
//! exactly one profile matched, and always carries the full candidate list.

pub mod client;
pub mod wire;

pub use client::resolve_profile;
pub use wire::{normalize_matches, OrganizationRef, ProfileMatch};

use serde::{Deserialize, Serialize};

/// Route of the UCS profile collection, relative to the API prefix.
pub const PROFILES_ROUTE: &str = "ucs/Profiles";

/// Default page-size cap for resolution queries.
pub const DEFAULT_RESOLVE_TOP: u32 = 10;

/// Query for [`resolve_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub name: String,
    /// Restrict to profiles owned by this organization.
    pub org: Option<String>,
    pub top: u32,
}

impl ResolveOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            org: None,
            top: DEFAULT_RESOLVE_TOP,
        }
    }

    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    /// Listing route with the encoded `$filter`.
    pub fn route(&self) -> String {
        format!(
            "{}?$top={}&$filter={}",
            PROFILES_ROUTE,
            self.top,
            urlencoding::encode(&name_filter(&self.name, self.org.as_deref()))
        )
    }
}

/// Outcome of a resolution.
///
/// Invariant: `moid` is `Some` iff `matches.len() == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moid: Option<String>,
    pub matches: Vec<ProfileMatch>,
}

impl ResolveResult {
    pub fn from_matches(name: impl Into<String>, matches: Vec<ProfileMatch>) -> Self {
        let moid = match matches.as_slice() {
            [only] => Some(only.moid.clone()),
            _ => None,
        };
        Self {
            name: name.into(),
            moid,
            matches,
        }
    }

    pub fn is_unique(&self) -> bool {
        self.moid.is_some()
    }
}

/// Quote a literal for the OData filter language (`'` doubles to `''`).
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `Name eq '<name>'`, plus `and Organization/Name eq '<org>'` when scoped.
pub fn name_filter(name: &str, org: Option<&str>) -> String {
    let mut clauses = vec![format!("Name eq {}", quote_literal(name))];
    if let Some(org) = org {
        clauses.push(format!("Organization/Name eq {}", quote_literal(org)));
    }
    clauses.join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, moid: &str) -> ProfileMatch {
        ProfileMatch {
            name: name.into(),
            moid: moid.into(),
            organization: None,
        }
    }

    #[test]
    fn test_name_filter_plain() {
        assert_eq!(name_filter("LabProfile", None), "Name eq 'LabProfile'");
    }

    #[test]
    fn test_name_filter_escapes_quotes() {
        assert_eq!(name_filter("O'Brien's", None), "Name eq 'O''Brien''s'");
    }

    #[test]
    fn test_name_filter_with_org() {
        assert_eq!(
            name_filter("Lab", Some("Eng'g")),
            "Name eq 'Lab' and Organization/Name eq 'Eng''g'"
        );
    }

    #[test]
    fn test_route_encodes_filter() {
        let route = ResolveOptions::new("LabProfile").route();
        assert_eq!(
            route,
            "ucs/Profiles?$top=10&$filter=Name%20eq%20%27LabProfile%27"
        );
    }

    #[test]
    fn test_route_custom_top_and_org() {
        let route = ResolveOptions::new("a b").org("Engineering").top(3).route();
        assert!(route.starts_with("ucs/Profiles?$top=3&$filter="));
        assert!(route.contains("Organization%2FName%20eq%20%27Engineering%27"));
        assert!(!route.contains(' '));
    }

    #[test]
    fn test_result_unique() {
        let result = ResolveResult::from_matches("LabProfile", vec![profile("LabProfile", "abc")]);
        assert_eq!(result.moid.as_deref(), Some("abc"));
        assert!(result.is_unique());
    }

    #[test]
    fn test_result_ambiguous_or_empty() {
        let none = ResolveResult::from_matches("x", vec![]);
        assert!(none.moid.is_none());

        let two = ResolveResult::from_matches("x", vec![profile("x", "1"), profile("x", "2")]);
        assert!(two.moid.is_none());
        assert_eq!(two.matches.len(), 2);
    }

    #[test]
    fn test_result_serialization_omits_missing_moid() {
        let json = serde_json::to_value(ResolveResult::from_matches("x", vec![])).unwrap();
        assert_eq!(json, serde_json::json!({"name": "x", "matches": []}));
    }
}
