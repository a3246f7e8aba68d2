//! MCP protocol messages.
//!
//! Parameter and result types for every method the bridge serves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Content, Prompt, PromptMessage, ServerCapabilities, ServerInfo, Tool};

// ============================================================================
// Initialize
// ============================================================================

/// Initialize response result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol version accepted.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: ServerCapabilities,
    /// Server info.
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

// ============================================================================
// Tools
// ============================================================================

/// tools/list response result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Available tools, in backend order.
    pub tools: Vec<Tool>,
}

/// tools/call request params.
///
/// `name` is optional so that an absent or `null` name is reported as a
/// missing parameter rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool name to call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool arguments; `null` decodes as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Map<String, serde_json::Value>>,
}

/// tools/call response result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Tool output content. The bridge always emits exactly one text block.
    pub content: Vec<Content>,
    /// Whether the tool call errored.
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// A successful result with a single text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    /// A failed result with a single text block.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// prompts/list response result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPromptsResult {
    /// Available prompts, in backend order.
    pub prompts: Vec<Prompt>,
}

/// prompts/get request params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name; absent and `null` are both missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Prompt arguments. Values must be strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<BTreeMap<String, String>>,
}

/// prompts/get response result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// Prompt description.
    #[serde(default)]
    pub description: String,
    /// Prompt messages.
    pub messages: Vec<PromptMessage>,
}
