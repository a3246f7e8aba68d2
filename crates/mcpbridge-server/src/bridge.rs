//! The bridge run loop.

use std::io::{BufRead, Write};

use mcpbridge_backend::Sender;
use mcpbridge_core::logging::{debug, error, info, targets, warn};
use mcpbridge_core::{CancellationToken, McpError, log_bridge, log_router};
use mcpbridge_protocol::{JsonRpcRequest, JsonRpcResponse, ServerInfo};
use mcpbridge_transport::{Codec, LineReader, ResponseWriter, TransportError};

use crate::context::RequestContext;
use crate::router::{Route, Router};

/// Default name reported in `serverInfo`.
pub const DEFAULT_SERVER_NAME: &str = "mcpbridge";

/// Default version reported in `serverInfo`.
pub const DEFAULT_SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Why [`Bridge::run`] returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The input stream ended.
    Eof,
    /// The cancellation token was set.
    Cancelled,
}

/// Translates stdio JSON-RPC into backend calls, one request at a time.
pub struct Bridge<S> {
    sender: S,
    router: Router,
    server_info: ServerInfo,
    codec: Codec,
}

impl<S: Sender> Bridge<S> {
    /// Creates a bridge with the default handlers and server identity.
    #[must_use]
    pub fn new(sender: S) -> Self {
        BridgeBuilder::new(sender).build()
    }

    /// Starts building a bridge.
    #[must_use]
    pub fn builder(sender: S) -> BridgeBuilder<S> {
        BridgeBuilder::new(sender)
    }

    /// Reads requests from `input` and writes responses to `output` until
    /// end of input or cancellation.
    ///
    /// Cancellation is checked before each read; a request already being
    /// handled always completes and gets its response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on a fatal stream fault: an input read
    /// failure, an oversized line, a response that cannot be encoded, or an
    /// output write failure.
    pub fn run<R: BufRead, W: Write>(
        &self,
        cancel: &CancellationToken,
        input: R,
        output: W,
    ) -> Result<StopReason, TransportError> {
        let mut reader = LineReader::with_codec(input, &self.codec);
        let writer = ResponseWriter::new(output);
        info!(
            target: targets::BRIDGE,
            "{} {} serving {} methods",
            self.server_info.name,
            self.server_info.version,
            self.router.methods().len()
        );

        loop {
            if cancel.is_cancelled() {
                log_bridge!("cancellation requested, stopping");
                return Ok(StopReason::Cancelled);
            }

            let line = match reader.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    log_bridge!("input closed");
                    return Ok(StopReason::Eof);
                }
                Err(e) => {
                    error!(target: targets::TRANSPORT, "input stream failed: {e}");
                    return Err(e);
                }
            };

            if let Some(response) = self.handle_line(line) {
                writer.write_response(&response).inspect_err(|e| {
                    error!(target: targets::TRANSPORT, "output stream failed: {e}");
                })?;
            }
        }
    }

    /// Handles one trimmed, non-blank input line.
    ///
    /// Returns the response to write, or `None` for notifications.
    pub fn handle_line(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        match self.codec.decode_request(line) {
            Ok(request) => self.handle_request(&request),
            Err(e) => {
                warn!(target: targets::CODEC, "malformed request: {e}");
                Some(JsonRpcResponse::error(None, McpError::parse_error(e).into()))
            }
        }
    }

    /// Dispatches one decoded request.
    ///
    /// Notification methods and requests without an id never produce a
    /// response, whatever their `jsonrpc` version.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let method = request.method.as_str();
        let handler = match self.router.route(method) {
            Route::Handler(handler) => Some(handler),
            Route::Notification => {
                info!(target: targets::ROUTER, "notification: {method}");
                return None;
            }
            Route::Unknown => None,
        };
        let Some(id) = request.id.as_ref() else {
            debug!(target: targets::ROUTER, "ignoring request without id: {method}");
            return None;
        };

        if !request.has_supported_version() {
            return Some(JsonRpcResponse::error(
                Some(id.clone()),
                McpError::invalid_request(format!(
                    "unsupported jsonrpc version: {}",
                    request.jsonrpc
                ))
                .into(),
            ));
        }

        let Some(handler) = handler else {
            log_router!("unknown method {method} (id {id})");
            return Some(JsonRpcResponse::error(
                Some(id.clone()),
                McpError::method_not_found(method).into(),
            ));
        };

        log_router!("dispatching {method} (id {id})");
        let ctx = RequestContext {
            id,
            params: request.params.as_ref(),
            backend: &self.sender,
            server_info: &self.server_info,
        };
        Some(match handler(&ctx) {
            Ok(result) => JsonRpcResponse::success(id.clone(), result),
            Err(e) => {
                debug!(target: targets::HANDLER, "{method} (id {id}) failed: {e}");
                JsonRpcResponse::error(Some(id.clone()), e.into())
            }
        })
    }
}

/// Builder for configuring a [`Bridge`].
pub struct BridgeBuilder<S> {
    sender: S,
    router: Router,
    server_info: ServerInfo,
    codec: Codec,
}

impl<S: Sender> BridgeBuilder<S> {
    /// Creates a builder with the default handlers and server identity.
    #[must_use]
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            router: Router::with_default_handlers(),
            server_info: ServerInfo::new(DEFAULT_SERVER_NAME, DEFAULT_SERVER_VERSION),
            codec: Codec::new(),
        }
    }

    /// Sets the name and version reported during the handshake.
    #[must_use]
    pub fn server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.server_info = ServerInfo::new(name, version);
        self
    }

    /// Replaces the dispatch table.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Sets the maximum input line size in bytes.
    #[must_use]
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.codec = Codec::with_max_message_size(size);
        self
    }

    /// Builds the bridge.
    #[must_use]
    pub fn build(self) -> Bridge<S> {
        Bridge {
            sender: self.sender,
            router: self.router,
            server_info: self.server_info,
            codec: self.codec,
        }
    }
}
