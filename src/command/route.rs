//! Route table — one intent, one API call.

use serde_json::Value;

use crate::command::{Intent, ListQuery};
use crate::domain::profile::PROFILES_ROUTE;
use crate::error::GatewayError;
use crate::transport::HttpMethod;

pub const PHYSICAL_SUMMARIES_ROUTE: &str = "compute/PhysicalSummaries";
pub const POOLS_ROUTE: &str = "ucs/Pools";

/// A concrete transport invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltCall {
    pub method: HttpMethod,
    /// Route relative to the API prefix.
    pub route: String,
    pub body: Option<Value>,
}

impl BuiltCall {
    fn get(route: String) -> Self {
        Self {
            method: HttpMethod::Get,
            route,
            body: None,
        }
    }
}

/// Map an intent to its call. Pure; the confirmation gate lives in the dispatcher.
pub fn build_call(intent: &Intent) -> Result<BuiltCall, GatewayError> {
    let call = match intent {
        Intent::ListPhysicalServers(query) => BuiltCall::get(list_route(PHYSICAL_SUMMARIES_ROUTE, query)),
        Intent::GetServerByMoid { moid } => {
            BuiltCall::get(member_route(PHYSICAL_SUMMARIES_ROUTE, moid))
        }
        Intent::ListUcsProfiles(query) => BuiltCall::get(list_route(PROFILES_ROUTE, query)),
        Intent::PatchUcsProfile { moid, body } => BuiltCall {
            method: HttpMethod::Patch,
            route: member_route(PROFILES_ROUTE, moid),
            body: body.clone(),
        },
        Intent::CreateUcsPool { payload } => BuiltCall {
            method: HttpMethod::Post,
            route: POOLS_ROUTE.to_string(),
            body: payload.clone(),
        },
        Intent::DeleteUcsProfile(request) => {
            let moid = request
                .moid
                .as_deref()
                .ok_or_else(|| GatewayError::validation("Missing moid"))?;
            BuiltCall {
                method: HttpMethod::Delete,
                route: member_route(PROFILES_ROUTE, moid),
                body: None,
            }
        }
        Intent::ResolveProfileByName { .. } => {
            return Err(GatewayError::validation(
                "resolve_profile_by_name is served by the resolver, not a single call",
            ));
        }
    };
    Ok(call)
}

fn list_route(collection: &str, query: &ListQuery) -> String {
    let mut route = format!("{}?$top={}", collection, query.top);
    if let Some(filter) = &query.filter {
        route = format!("{}&$filter={}", route, urlencoding::encode(filter));
    }
    route
}

fn member_route(collection: &str, moid: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(moid))
}
