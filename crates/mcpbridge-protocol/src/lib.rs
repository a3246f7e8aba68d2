//! MCP protocol types and JSON-RPC envelopes.
//!
//! This crate provides:
//! - JSON-RPC 2.0 request and response envelopes
//! - The MCP result and parameter types the bridge speaks (tools, prompts)
//!
//! # Wire Format
//!
//! All messages are newline-delimited JSON. Request ids are echoed back
//! with their original JSON type, so a numeric id of `7` is answered with `7`
//! and a string id of `"7"` with `"7"`.

#![forbid(unsafe_code)]

mod jsonrpc;
mod messages;
mod types;

pub use jsonrpc::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use messages::*;
pub use types::*;
