//! Plugin request and response messages.
//!
//! Each [`PluginRequest`] carries a correlation id and exactly one request
//! variant. The backend answers with a [`PluginResponse`] echoing the id and
//! at most one response variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Struct;

// ============================================================================
// Envelopes
// ============================================================================

/// A request to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginRequest {
    /// Correlation id, echoed in the response.
    pub request_id: String,
    /// The request payload.
    pub request: Request,
}

impl PluginRequest {
    /// Creates a request with the given correlation id.
    #[must_use]
    pub fn new(request_id: impl Into<String>, request: Request) -> Self {
        Self {
            request_id: request_id.into(),
            request,
        }
    }
}

/// Request payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Enumerate tools.
    ListTools(ListToolsRequest),
    /// Invoke a tool.
    ToolCall(ToolRequest),
    /// Enumerate prompts.
    ListPrompts(ListPromptsRequest),
    /// Render a prompt.
    PromptGet(PromptGetRequest),
}

impl Request {
    /// Operation name used in logs and error messages.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Request::ListTools(_) => "list_tools",
            Request::ToolCall(_) => "tool_call",
            Request::ListPrompts(_) => "list_prompts",
            Request::PromptGet(_) => "prompt_get",
        }
    }
}

/// A response from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
    /// Correlation id of the request being answered.
    pub request_id: String,
    /// The response payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

impl PluginResponse {
    /// Creates a response with a payload.
    #[must_use]
    pub fn new(request_id: impl Into<String>, response: Response) -> Self {
        Self {
            request_id: request_id.into(),
            response: Some(response),
        }
    }

    /// Creates a response without a payload.
    #[must_use]
    pub fn empty(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            response: None,
        }
    }

    /// Returns the tool list if this is a list_tools response.
    #[must_use]
    pub fn list_tools(&self) -> Option<&ListToolsResponse> {
        match &self.response {
            Some(Response::ListTools(r)) => Some(r),
            _ => None,
        }
    }

    /// Returns the tool result if this is a tool_call response.
    #[must_use]
    pub fn tool_call(&self) -> Option<&ToolResponse> {
        match &self.response {
            Some(Response::ToolCall(r)) => Some(r),
            _ => None,
        }
    }

    /// Returns the prompt list if this is a list_prompts response.
    #[must_use]
    pub fn list_prompts(&self) -> Option<&ListPromptsResponse> {
        match &self.response {
            Some(Response::ListPrompts(r)) => Some(r),
            _ => None,
        }
    }

    /// Returns the rendered prompt if this is a prompt_get response.
    #[must_use]
    pub fn prompt_get(&self) -> Option<&PromptGetResponse> {
        match &self.response {
            Some(Response::PromptGet(r)) => Some(r),
            _ => None,
        }
    }
}

/// Response payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Tool enumeration.
    ListTools(ListToolsResponse),
    /// Tool invocation result.
    ToolCall(ToolResponse),
    /// Prompt enumeration.
    ListPrompts(ListPromptsResponse),
    /// Rendered prompt.
    PromptGet(PromptGetResponse),
}

// ============================================================================
// Tools
// ============================================================================

/// Empty list_tools request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListToolsRequest {}

/// list_tools response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResponse {
    /// Registered tools.
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

/// A tool registered with the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Input schema as a structured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Struct>,
}

/// A tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool to invoke.
    pub tool_name: String,
    /// Arguments; absent when the client sent none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Struct>,
    /// Identity of the caller.
    #[serde(default)]
    pub caller_plugin: String,
}

/// The outcome of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the tool succeeded.
    pub success: bool,
    /// Result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Struct>,
    /// Machine-readable error code.
    #[serde(default)]
    pub error_code: String,
    /// Human-readable error message.
    #[serde(default)]
    pub error_message: String,
}

impl ToolResponse {
    /// A successful response with the given result.
    #[must_use]
    pub fn ok(result: Struct) -> Self {
        Self {
            success: true,
            result: Some(result),
            ..Self::default()
        }
    }

    /// A failed response.
    #[must_use]
    pub fn failed(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error_code: error_code.into(),
            error_message: error_message.into(),
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// Empty list_prompts request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPromptsRequest {}

/// list_prompts response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPromptsResponse {
    /// Registered prompts.
    #[serde(default)]
    pub prompts: Vec<PromptDefinition>,
}

/// A prompt registered with the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Prompt name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Declared arguments.
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

/// A declared prompt argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the argument must be supplied.
    #[serde(default)]
    pub required: bool,
}

/// A prompt render request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptGetRequest {
    /// Prompt to render.
    pub prompt_name: String,
    /// String arguments.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
}

/// A rendered prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptGetResponse {
    /// Prompt description.
    #[serde(default)]
    pub description: String,
    /// Rendered messages.
    #[serde(default)]
    pub messages: Vec<PromptMessage>,
}

/// One message of a rendered prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Speaker role.
    #[serde(default)]
    pub role: String,
    /// Message body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentBlock>,
}

/// A typed block of prompt content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type, e.g. `"text"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text payload.
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_is_tagged_by_operation() {
        let req = PluginRequest::new(
            "stdio-lt-1",
            Request::ListTools(ListToolsRequest::default()),
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"request_id": "stdio-lt-1", "request": {"list_tools": {}}})
        );
        assert_eq!(req.request.operation(), "list_tools");
    }

    #[test]
    fn tool_request_omits_absent_arguments() {
        let req = ToolRequest {
            tool_name: "echo".into(),
            arguments: None,
            caller_plugin: "transport.stdio".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("arguments").is_none());
    }

    #[test]
    fn accessors_match_variant() {
        let resp = PluginResponse::new(
            "x",
            Response::ToolCall(ToolResponse::failed("E_BAD", "bad input")),
        );
        assert!(resp.tool_call().is_some());
        assert!(resp.list_tools().is_none());
        assert!(resp.list_prompts().is_none());
        assert!(resp.prompt_get().is_none());
        assert!(PluginResponse::empty("x").tool_call().is_none());
    }

    #[test]
    fn response_without_payload_decodes() {
        let resp: PluginResponse = serde_json::from_value(json!({"request_id": "a"})).unwrap();
        assert!(resp.response.is_none());
    }

    #[test]
    fn prompt_message_content_is_optional() {
        let msg: PromptMessage = serde_json::from_value(json!({"role": "user"})).unwrap();
        assert!(msg.content.is_none());
        let block: ContentBlock =
            serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
        assert_eq!(block.kind, "text");
    }

    #[test]
    fn operation_names() {
        assert_eq!(
            Request::ToolCall(ToolRequest::default()).operation(),
            "tool_call"
        );
        assert_eq!(
            Request::ListPrompts(ListPromptsRequest::default()).operation(),
            "list_prompts"
        );
        assert_eq!(
            Request::PromptGet(PromptGetRequest::default()).operation(),
            "prompt_get"
        );
    }
}
