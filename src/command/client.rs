//! Commands sub-client — dispatch with the delete confirmation gate.

use crate::client::IntersightClient;
use crate::command::dispatch::{dispatch, DispatchOutcome};
use crate::command::Command;
use crate::error::GatewayError;
use crate::transport::Transport;

pub struct Commands<'a, T> {
    pub(crate) client: &'a IntersightClient<T>,
}

impl<'a, T: Transport> Commands<'a, T> {
    /// Execute one command. See [`dispatch`] for the delete protocol.
    pub async fn dispatch(&self, command: Command) -> Result<DispatchOutcome, GatewayError> {
        dispatch(self.client.transport(), command).await
    }

    /// Parse a raw `{name, parameters | slots}` object and execute it.
    pub async fn dispatch_value(
        &self,
        raw: serde_json::Value,
    ) -> Result<DispatchOutcome, GatewayError> {
        let command: Command = serde_json::from_value(raw)
            .map_err(|e| GatewayError::validation(format!("Malformed command: {}", e)))?;
        self.dispatch(command).await
    }
}
