//! mcpbridge: serve a structured plugin backend to MCP clients over stdio.
//!
//! The bridge is stateless. Each JSON-RPC request read from the input stream
//! is answered locally (`initialize`, `ping`) or forwarded as one synchronous
//! call to the backend (`tools/*`, `prompts/*`), and exactly one response line
//! is written for every request that carries an id.
//!
//! # Quick Start
//!
//! ```ignore
//! use mcpbridge::prelude::*;
//!
//! let sender = TcpSender::connect("localhost:9100", TcpSenderConfig::default())?;
//! let bridge = Bridge::builder(sender)
//!     .server_info("orchestra", "1.0.0")
//!     .build();
//!
//! let stdin = std::io::stdin().lock();
//! bridge.run(&CancellationToken::new(), stdin, std::io::stdout())?;
//! ```
//!
//! # Crates
//!
//! - `mcpbridge-core`: errors, cancellation, log targets
//! - `mcpbridge-protocol`: JSON-RPC envelopes and MCP result types
//! - `mcpbridge-backend`: the structured backend model and its TCP sender
//! - `mcpbridge-transport`: line codec and stdio reader/writer
//! - `mcpbridge-server`: router, handlers, value translation and the run loop

#![forbid(unsafe_code)]

pub mod testing;

pub use mcpbridge_core::{CancellationToken, McpError, McpErrorCode, McpResult, logging};

pub use mcpbridge_protocol as protocol;
pub use mcpbridge_protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, RequestId, ServerInfo,
};

pub use mcpbridge_backend as backend;
pub use mcpbridge_backend::{
    PluginRequest, PluginResponse, SendError, Sender, Struct, TcpSender, TcpSenderConfig, Value,
};

pub use mcpbridge_transport::{Codec, CodecError, LineReader, ResponseWriter, TransportError};

pub use mcpbridge_server::translator;
pub use mcpbridge_server::{
    Bridge, BridgeBuilder, ConversionError, Handler, RequestContext, Route, Router, StopReason,
};

/// Everything needed to embed the bridge.
pub mod prelude {
    pub use crate::{
        Bridge, BridgeBuilder, CancellationToken, McpError, McpResult, RequestContext, Router,
        Sender, StopReason, TcpSender, TcpSenderConfig,
    };
}
