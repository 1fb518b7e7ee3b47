//! Dispatcher — executes intents and gates irreversible ones.
//!
//! ## Delete protocol
//!
//! `delete_ucs_profile` runs in two calls from the caller:
//!
//! 1. Without `confirm: "DELETE"` nothing is deleted. A missing `moid` with a
//!    `name` is resolved first; zero or several matches answer with step
//!    `select` and the candidates, otherwise step `confirm` with the MOID.
//! 2. With the exact literal and a `moid`, the DELETE is issued.
//!
//! State travels entirely in the caller's parameters. A confirmed call is not
//! re-resolved: it must name the MOID it wants deleted, and a name alone is
//! rejected rather than resolved and deleted in the same call.

use serde::{Deserialize, Serialize};

use crate::command::route::build_call;
use crate::command::{Command, DeleteRequest, Intent, CONFIRM_TOKEN};
use crate::domain::profile::{resolve_profile, ProfileMatch, ResolveOptions, ResolveResult};
use crate::error::GatewayError;
use crate::transport::{ApiPayload, HttpMethod, Transport};

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Response of a get, post or patch.
    Payload(ApiPayload),
    /// A delete was executed.
    Deleted,
    /// Name resolution result, returned verbatim.
    Resolved(ResolveResult),
    /// The caller must act before anything irreversible happens.
    NeedsConfirmation(ConfirmationPrompt),
}

impl DispatchOutcome {
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::NeedsConfirmation(_))
    }
}

/// A `needsConfirmation` answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    #[serde(rename = "needsConfirmation")]
    pub needs_confirmation: bool,
    #[serde(flatten)]
    pub step: ConfirmationStep,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConfirmationStep {
    /// Resolution was ambiguous; the caller picks a MOID.
    Select { matches: Vec<ProfileMatch> },
    /// Target known; the caller resends with the confirmation literal.
    Confirm {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        moid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        route: Option<String>,
    },
}

impl ConfirmationPrompt {
    pub fn select(matches: Vec<ProfileMatch>) -> Self {
        Self {
            needs_confirmation: true,
            step: ConfirmationStep::Select { matches },
            message: "Multiple or zero profiles matched; pick one MOID".to_string(),
        }
    }

    pub fn confirm_moid(moid: impl Into<String>) -> Self {
        Self {
            needs_confirmation: true,
            step: ConfirmationStep::Confirm {
                moid: Some(moid.into()),
                route: None,
            },
            message: confirm_message(),
        }
    }

    pub fn confirm_route(route: impl Into<String>) -> Self {
        Self {
            needs_confirmation: true,
            step: ConfirmationStep::Confirm {
                moid: None,
                route: Some(route.into()),
            },
            message: confirm_message(),
        }
    }
}

fn confirm_message() -> String {
    format!(
        "Irreversible deletion. Resend with confirm: \"{}\" to proceed",
        CONFIRM_TOKEN
    )
}

/// Validate and execute one command.
///
/// Unknown names and missing identifiers fail before any network activity.
/// Transport failures pass through untouched.
pub async fn dispatch<T: Transport + ?Sized>(
    transport: &T,
    command: Command,
) -> Result<DispatchOutcome, GatewayError> {
    let intent = Intent::parse(&command)?;
    tracing::debug!(intent = intent.name(), "Dispatching command");

    match intent {
        Intent::ResolveProfileByName { name, org } => {
            let options = ResolveOptions {
                org,
                ..ResolveOptions::new(name)
            };
            Ok(DispatchOutcome::Resolved(
                resolve_profile(transport, &options).await?,
            ))
        }
        Intent::DeleteUcsProfile(request) if !request.is_confirmed() => {
            gate_delete(transport, request).await
        }
        Intent::DeleteUcsProfile(request) if request.moid.is_none() => Err(
            GatewayError::validation("Missing moid; resend with the moid returned by the confirm step"),
        ),
        intent => execute(transport, &intent).await,
    }
}

/// Unconfirmed delete: resolve if needed, then ask. Never deletes.
async fn gate_delete<T: Transport + ?Sized>(
    transport: &T,
    mut request: DeleteRequest,
) -> Result<DispatchOutcome, GatewayError> {
    if request.moid.is_none() {
        if let Some(name) = request.name.clone() {
            let options = ResolveOptions {
                org: request.org.clone(),
                ..ResolveOptions::new(name)
            };
            let resolved = resolve_profile(transport, &options).await?;
            match resolved.moid {
                Some(moid) => request.moid = Some(moid),
                None => {
                    tracing::info!(
                        name = %resolved.name,
                        matches = resolved.matches.len(),
                        "Delete needs a selection"
                    );
                    return Ok(DispatchOutcome::NeedsConfirmation(
                        ConfirmationPrompt::select(resolved.matches),
                    ));
                }
            }
        }
    }

    let moid = request
        .moid
        .ok_or_else(|| GatewayError::validation("Missing moid or name"))?;
    tracing::info!(moid = %moid, "Delete awaiting confirmation");
    Ok(DispatchOutcome::NeedsConfirmation(
        ConfirmationPrompt::confirm_moid(moid),
    ))
}

async fn execute<T: Transport + ?Sized>(
    transport: &T,
    intent: &Intent,
) -> Result<DispatchOutcome, GatewayError> {
    let call = build_call(intent)?;
    let body = call.body.as_ref();

    let outcome = match call.method {
        HttpMethod::Get => DispatchOutcome::Payload(transport.get(&call.route).await?),
        HttpMethod::Post => DispatchOutcome::Payload(transport.post(&call.route, body).await?),
        HttpMethod::Patch => DispatchOutcome::Payload(transport.patch(&call.route, body).await?),
        HttpMethod::Delete => {
            transport.delete(&call.route).await?;
            tracing::info!(route = %call.route, "Deleted");
            DispatchOutcome::Deleted
        }
    };
    Ok(outcome)
}
