//! The dispatch-and-translation engine of mcpbridge.
//!
//! A [`Bridge`] reads newline-delimited JSON-RPC requests, routes each one
//! through a [`Router`] to a handler, and writes exactly one response line
//! for every request that carries an id. Handlers that need the backend make
//! one synchronous [`Sender`](mcpbridge_backend::Sender) call and translate
//! the structured reply with the functions in [`translator`].
//!
//! # Example
//!
//! ```ignore
//! use mcpbridge_server::Bridge;
//! use mcpbridge_core::CancellationToken;
//!
//! let bridge = Bridge::builder(sender).server_info("orchestra", "1.0.0").build();
//! let stdin = std::io::stdin().lock();
//! bridge.run(&CancellationToken::new(), stdin, std::io::stdout())?;
//! ```

#![forbid(unsafe_code)]

mod bridge;
mod context;
pub mod handlers;
mod router;
pub mod translator;

pub use bridge::{
    Bridge, BridgeBuilder, DEFAULT_SERVER_NAME, DEFAULT_SERVER_VERSION, StopReason,
};
pub use context::{RequestContext, unexpected_response};
pub use router::{Handler, NOTIFICATION_PREFIX, Route, Router};
pub use translator::ConversionError;
