//! Backend side of the bridge.
//!
//! The backend speaks a typed plugin protocol: every call is a
//! [`PluginRequest`] answered by exactly one [`PluginResponse`]. Values inside
//! those messages use the structured [`Value`] model rather than raw JSON.
//!
//! - [`value`]: the structured value model
//! - [`plugin`]: request and response messages
//! - [`Sender`]: one synchronous round trip to the backend
//! - [`TcpSender`]: a length-prefixed JSON implementation over TCP

#![forbid(unsafe_code)]

pub mod plugin;
mod sender;
pub mod tcp;
pub mod value;

pub use plugin::{
    ContentBlock, ListPromptsRequest, ListPromptsResponse, ListToolsRequest, ListToolsResponse,
    PluginRequest, PluginResponse, PromptArgument, PromptDefinition, PromptGetRequest,
    PromptGetResponse, PromptMessage, Request, Response, ToolDefinition, ToolRequest,
    ToolResponse,
};
pub use sender::{SendError, Sender};
pub use tcp::{TcpSender, TcpSenderConfig};
pub use value::{ListValue, Struct, Value};
