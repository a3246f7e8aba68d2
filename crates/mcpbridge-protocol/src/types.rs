//! MCP protocol types.
//!
//! Core types used in MCP communication.

use serde::{Deserialize, Serialize};

/// MCP protocol version.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server capabilities advertised during initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
    /// Prompt-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,
}

impl ServerCapabilities {
    /// Capabilities of the bridge: tools and prompts, without change
    /// notifications.
    #[must_use]
    pub fn tools_and_prompts() -> Self {
        Self {
            tools: Some(ToolsCapability::default()),
            prompts: Some(PromptsCapability::default()),
        }
    }
}

/// Tool capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether the server supports tool list changes.
    #[serde(
        rename = "listChanged",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub list_changed: bool,
}

/// Prompt capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptsCapability {
    /// Whether the server supports prompt list changes.
    #[serde(
        rename = "listChanged",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub list_changed: bool,
}

/// Server information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl ServerInfo {
    /// Creates server info from a name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name.
    pub name: String,
    /// Tool description.
    #[serde(default)]
    pub description: String,
    /// Input schema; `null` when the backend supplied none.
    #[serde(rename = "inputSchema", default)]
    pub input_schema: serde_json::Value,
}

/// Prompt definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Prompt name.
    pub name: String,
    /// Prompt description.
    #[serde(default)]
    pub description: String,
    /// Prompt arguments, always present on the wire.
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

/// Prompt argument definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Argument description.
    #[serde(default)]
    pub description: String,
    /// Whether the argument is required.
    #[serde(default)]
    pub required: bool,
}

/// A content block.
///
/// The bridge only produces text blocks, but prompt messages forward whatever
/// type tag the backend supplied, including an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Block type, e.g. `"text"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload.
    pub text: String,
}

impl Content {
    /// Creates a `"text"` content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_owned(),
            text: text.into(),
        }
    }
}

/// A message in a prompt.
///
/// The role is forwarded verbatim from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Message role, e.g. `"user"` or `"assistant"`.
    pub role: String,
    /// Message content.
    pub content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn capabilities_serialize_as_empty_objects() {
        let caps = ServerCapabilities::tools_and_prompts();
        assert_eq!(
            serde_json::to_value(&caps).unwrap(),
            json!({"tools": {}, "prompts": {}})
        );
    }

    #[test]
    fn list_changed_uses_camel_case() {
        let caps = ToolsCapability { list_changed: true };
        assert_eq!(
            serde_json::to_value(&caps).unwrap(),
            json!({"listChanged": true})
        );
    }

    #[test]
    fn tool_without_schema_has_null_input_schema() {
        let tool = Tool {
            name: "echo".into(),
            description: String::new(),
            input_schema: serde_json::Value::Null,
        };
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"name": "echo", "description": "", "inputSchema": null})
        );
    }

    #[test]
    fn prompt_always_carries_arguments() {
        let prompt = Prompt {
            name: "greet".into(),
            description: "say hi".into(),
            arguments: Vec::new(),
        };
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(value["arguments"], json!([]));
    }

    #[test]
    fn content_text_helper() {
        let content = Content::text("hello");
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({"type": "text", "text": "hello"})
        );
        assert_eq!(
            serde_json::to_value(Content::default()).unwrap(),
            json!({"type": "", "text": ""})
        );
    }
}
