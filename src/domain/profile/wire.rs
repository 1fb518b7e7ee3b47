//! Wire types for UCS profile listings (REST).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transport::ApiPayload;

/// One candidate returned by a profile listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMatch {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Moid", default)]
    pub moid: String,
    #[serde(rename = "Organization", default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationRef>,
}

/// Organization relationship attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Moid", default, skip_serializing_if = "Option::is_none")]
    pub moid: Option<String>,
}

/// Extract the result list from a listing response.
///
/// Precedence: `Results`, then `items`, then the payload itself as a bare list.
/// Anything else (text, an object with neither field, a non-list) is an empty
/// list. Entries that are not objects are skipped.
pub fn normalize_matches(payload: &ApiPayload) -> Vec<ProfileMatch> {
    let Some(root) = payload.as_json() else {
        return Vec::new();
    };

    let list = present(root.get("Results"))
        .or_else(|| present(root.get("items")))
        .unwrap_or(root);

    let Some(entries) = list.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match ProfileMatch::deserialize(entry) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed profile entry");
                None
            }
        })
        .collect()
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(matches: &[ProfileMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_results_wrapper() {
        let payload = ApiPayload::Json(json!({
            "ObjectType": "ucs.Profile.List",
            "Results": [
                {"Name": "LabProfile", "Moid": "abc", "Organization": {"Name": "default"}}
            ]
        }));
        let matches = normalize_matches(&payload);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].moid, "abc");
        assert_eq!(
            matches[0].organization.as_ref().and_then(|o| o.name.as_deref()),
            Some("default")
        );
    }

    #[test]
    fn test_items_wrapper() {
        let payload = ApiPayload::Json(json!({
            "items": [{"Name": "a", "Moid": "1"}, {"Name": "b", "Moid": "2"}]
        }));
        assert_eq!(names(&normalize_matches(&payload)), vec!["a", "b"]);
    }

    #[test]
    fn test_bare_list() {
        let payload = ApiPayload::Json(json!([{"Name": "solo", "Moid": "9"}]));
        assert_eq!(names(&normalize_matches(&payload)), vec!["solo"]);
    }

    #[test]
    fn test_results_wins_over_items() {
        let payload = ApiPayload::Json(json!({
            "Results": [{"Name": "from-results", "Moid": "1"}],
            "items": [{"Name": "from-items", "Moid": "2"}]
        }));
        assert_eq!(names(&normalize_matches(&payload)), vec!["from-results"]);
    }

    #[test]
    fn test_null_results_falls_through_to_items() {
        let payload = ApiPayload::Json(json!({
            "Results": null,
            "items": [{"Name": "from-items", "Moid": "2"}]
        }));
        assert_eq!(names(&normalize_matches(&payload)), vec!["from-items"]);
    }

    #[test]
    fn test_unrecognised_shapes_are_empty() {
        assert!(normalize_matches(&ApiPayload::Json(json!({"Count": 0}))).is_empty());
        assert!(normalize_matches(&ApiPayload::Json(json!({"Results": "nope"}))).is_empty());
        assert!(normalize_matches(&ApiPayload::Json(Value::Null)).is_empty());
        assert!(normalize_matches(&ApiPayload::Text("gateway timeout".into())).is_empty());
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let payload = ApiPayload::Json(json!({"Results": [42, {"Name": "ok", "Moid": "1"}]}));
        assert_eq!(names(&normalize_matches(&payload)), vec!["ok"]);
    }

    #[test]
    fn test_match_serializes_with_api_field_names() {
        let m = ProfileMatch {
            name: "LabProfile".into(),
            moid: "abc".into(),
            organization: None,
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"Name": "LabProfile", "Moid": "abc"})
        );
    }
}
