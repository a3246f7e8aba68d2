//! Per-request handler context.

use log::{debug, warn};
use mcpbridge_backend::{PluginRequest, PluginResponse, Request, Sender};
use mcpbridge_core::logging::targets;
use mcpbridge_core::{McpError, McpResult};
use mcpbridge_protocol::{RequestId, ServerInfo};
use serde::de::DeserializeOwned;

/// Everything a handler sees for one request.
///
/// Borrowed from the bridge for the duration of a single dispatch.
pub struct RequestContext<'a> {
    /// The JSON-RPC id being answered.
    pub id: &'a RequestId,
    /// Raw request parameters.
    pub params: Option<&'a serde_json::Value>,
    /// Backend used for capability calls.
    pub backend: &'a dyn Sender,
    /// Identity reported during the handshake.
    pub server_info: &'a ServerInfo,
}

impl RequestContext<'_> {
    /// Derives the backend correlation id, e.g. `stdio-tc-7`.
    #[must_use]
    pub fn correlation_id(&self, tag: &str) -> String {
        format!("stdio-{tag}-{}", self.id)
    }

    /// Decodes the parameters, falling back to `T::default()` when absent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` naming the offending field, e.g.
    /// `invalid params: arguments.n: invalid type: ...`.
    pub fn params_or_default<T: DeserializeOwned + Default>(&self) -> McpResult<T> {
        let Some(value) = self.params else {
            return Ok(T::default());
        };
        serde_path_to_error::deserialize(value).map_err(|e| {
            let message = if e.path().iter().next().is_none() {
                format!("invalid params: {}", e.inner())
            } else {
                format!("invalid params: {}: {}", e.path(), e.inner())
            };
            McpError::invalid_params(message)
        })
    }

    /// Performs one backend round trip.
    ///
    /// # Errors
    ///
    /// A transport failure becomes `InternalError` with the failure text
    /// verbatim.
    pub fn call_backend(&self, tag: &str, request: Request) -> McpResult<PluginResponse> {
        let operation = request.operation();
        let request = PluginRequest::new(self.correlation_id(tag), request);
        debug!(
            target: targets::BACKEND,
            "{operation} request {}",
            request.request_id
        );
        self.backend.send(&request).map_err(|e| {
            warn!(target: targets::BACKEND, "{operation} failed: {e}");
            McpError::internal_error(format!("backend {operation} failed: {e}"))
        })
    }
}

/// The error for a backend reply of the wrong shape.
#[must_use]
pub fn unexpected_response() -> McpError {
    McpError::internal_error("unexpected response type from backend")
}
