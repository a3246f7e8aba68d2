//! Method handlers.
//!
//! `initialize` and `ping` answer locally. The list and invoke handlers make
//! exactly one backend call each and translate the reply.

use mcpbridge_backend::{
    ListPromptsRequest, ListToolsRequest, PromptDefinition, PromptGetRequest, PromptGetResponse,
    Request, Struct, ToolDefinition, ToolRequest, ToolResponse,
};
use mcpbridge_core::{McpError, McpResult, log_handler};
use mcpbridge_protocol::{
    CallToolParams, CallToolResult, Content, GetPromptParams, GetPromptResult, InitializeResult,
    ListPromptsResult, ListToolsResult, PROTOCOL_VERSION, Prompt, PromptArgument, PromptMessage,
    ServerCapabilities, Tool,
};
use serde::Serialize;

use crate::context::{RequestContext, unexpected_response};
use crate::translator::{json_map_to_struct, optional_struct_to_json, struct_to_json};

/// Caller identity attached to tool invocations.
pub const CALLER_TAG: &str = "transport.stdio";

fn to_result<T: Serialize>(value: &T) -> McpResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| McpError::internal_error(e.to_string()))
}

fn missing_name() -> McpError {
    McpError::invalid_params("missing required parameter: name")
}

// ============================================================================
// Local
// ============================================================================

/// Handles `initialize`. Parameters are ignored.
pub fn initialize(ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    log_handler!("initialize from request {}", ctx.id);
    to_result(&InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_owned(),
        capabilities: ServerCapabilities::tools_and_prompts(),
        server_info: ctx.server_info.clone(),
    })
}

/// Handles `ping`.
pub fn ping(_ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    Ok(serde_json::json!({}))
}

// ============================================================================
// Tools
// ============================================================================

/// Handles `tools/list`.
pub fn tools_list(ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    let response = ctx.call_backend("lt", Request::ListTools(ListToolsRequest::default()))?;
    let listed = response.list_tools().ok_or_else(unexpected_response)?;
    log_handler!("backend listed {} tools", listed.tools.len());
    to_result(&ListToolsResult {
        tools: listed.tools.iter().map(tool_to_mcp).collect(),
    })
}

/// Handles `tools/call`.
pub fn tools_call(ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    let params: CallToolParams = ctx.params_or_default()?;
    let Some(name) = params.name.filter(|name| !name.is_empty()) else {
        return Err(missing_name());
    };
    let arguments = params
        .arguments
        .as_ref()
        .map(json_map_to_struct)
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("invalid arguments: {e}")))?;

    log_handler!("calling tool {name}");
    let response = ctx.call_backend(
        "tc",
        Request::ToolCall(ToolRequest {
            tool_name: name,
            arguments,
            caller_plugin: CALLER_TAG.to_owned(),
        }),
    )?;
    let outcome = response.tool_call().ok_or_else(unexpected_response)?;
    to_result(&tool_result(outcome))
}

/// Converts a backend tool definition to its MCP form.
#[must_use]
pub fn tool_to_mcp(definition: &ToolDefinition) -> Tool {
    Tool {
        name: definition.name.clone(),
        description: definition.description.clone(),
        input_schema: optional_struct_to_json(definition.input_schema.as_ref()),
    }
}

/// Renders a backend tool outcome as a single-text-block result.
///
/// Failures keep a successful envelope and set `isError`.
#[must_use]
pub fn tool_result(response: &ToolResponse) -> CallToolResult {
    if !response.success {
        let message = if response.error_message.is_empty() {
            format!("tool error: {}", response.error_code)
        } else {
            response.error_message.clone()
        };
        return CallToolResult::error(message);
    }
    CallToolResult::text(result_text(response.result.as_ref()))
}

/// The `text` field if present (empty unless it is a string), otherwise the
/// whole result as compact JSON.
fn result_text(result: Option<&Struct>) -> String {
    let Some(result) = result else {
        return String::new();
    };
    match result.get("text") {
        Some(text) => text.as_str().unwrap_or_default().to_owned(),
        None => struct_to_json(result).to_string(),
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// Handles `prompts/list`.
pub fn prompts_list(ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    let response = ctx.call_backend("lp", Request::ListPrompts(ListPromptsRequest::default()))?;
    let listed = response.list_prompts().ok_or_else(unexpected_response)?;
    log_handler!("backend listed {} prompts", listed.prompts.len());
    to_result(&ListPromptsResult {
        prompts: listed.prompts.iter().map(prompt_to_mcp).collect(),
    })
}

/// Handles `prompts/get`.
pub fn prompts_get(ctx: &RequestContext<'_>) -> McpResult<serde_json::Value> {
    let params: GetPromptParams = ctx.params_or_default()?;
    let Some(name) = params.name.filter(|name| !name.is_empty()) else {
        return Err(missing_name());
    };

    log_handler!("rendering prompt {name}");
    let response = ctx.call_backend(
        "pg",
        Request::PromptGet(PromptGetRequest {
            prompt_name: name,
            arguments: params.arguments.unwrap_or_default(),
        }),
    )?;
    let rendered = response.prompt_get().ok_or_else(unexpected_response)?;
    to_result(&prompt_result(rendered))
}

/// Converts a backend prompt definition to its MCP form.
#[must_use]
pub fn prompt_to_mcp(definition: &PromptDefinition) -> Prompt {
    Prompt {
        name: definition.name.clone(),
        description: definition.description.clone(),
        arguments: definition
            .arguments
            .iter()
            .map(|arg| PromptArgument {
                name: arg.name.clone(),
                description: arg.description.clone(),
                required: arg.required,
            })
            .collect(),
    }
}

/// Forwards a rendered prompt; a message without content gets an empty block.
#[must_use]
pub fn prompt_result(response: &PromptGetResponse) -> GetPromptResult {
    GetPromptResult {
        description: response.description.clone(),
        messages: response
            .messages
            .iter()
            .map(|message| PromptMessage {
                role: message.role.clone(),
                content: message
                    .content
                    .as_ref()
                    .map(|block| Content {
                        kind: block.kind.clone(),
                        text: block.text.clone(),
                    })
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpbridge_backend::PromptMessage as BackendMessage;
    use mcpbridge_backend::{
        ContentBlock, ListToolsResponse, PluginRequest, PluginResponse, Response, SendError,
        Sender, Value,
    };
    use mcpbridge_core::McpErrorCode;
    use mcpbridge_protocol::{RequestId, ServerInfo};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed response.
    struct Fixed {
        response: Option<Response>,
        seen: Mutex<Vec<PluginRequest>>,
    }

    impl Fixed {
        fn new(response: Option<Response>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> PluginRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Sender for Fixed {
        fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(PluginResponse {
                request_id: request.request_id.clone(),
                response: self.response.clone(),
            })
        }
    }

    fn call(
        handler: fn(&RequestContext<'_>) -> McpResult<serde_json::Value>,
        backend: &dyn Sender,
        params: Option<serde_json::Value>,
    ) -> McpResult<serde_json::Value> {
        let id = RequestId::from(9);
        let info = ServerInfo::new("bridge", "1.2.3");
        handler(&RequestContext {
            id: &id,
            params: params.as_ref(),
            backend,
            server_info: &info,
        })
    }

    #[test]
    fn initialize_reports_server_info() {
        let backend = Fixed::new(None);
        let result = call(initialize, &backend, Some(json!({"anything": true}))).unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["capabilities"], json!({"tools": {}, "prompts": {}}));
        assert_eq!(result["serverInfo"], json!({"name": "bridge", "version": "1.2.3"}));
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn ping_is_empty_object() {
        assert_eq!(call(ping, &Fixed::new(None), None).unwrap(), json!({}));
    }

    #[test]
    fn tools_list_translates_schema() {
        let backend = Fixed::new(Some(Response::ListTools(ListToolsResponse {
            tools: vec![
                ToolDefinition {
                    name: "echo".into(),
                    description: "Echo input".into(),
                    input_schema: Some(Struct::new().with("type", "object")),
                },
                ToolDefinition {
                    name: "bare".into(),
                    ..ToolDefinition::default()
                },
            ],
        })));
        let result = call(tools_list, &backend, None).unwrap();
        assert_eq!(
            result,
            json!({"tools": [
                {"name": "echo", "description": "Echo input", "inputSchema": {"type": "object"}},
                {"name": "bare", "description": "", "inputSchema": null}
            ]})
        );
        assert_eq!(backend.last().request_id, "stdio-lt-9");
    }

    #[test]
    fn list_with_wrong_reply_shape() {
        let backend = Fixed::new(Some(Response::ToolCall(ToolResponse::default())));
        let err = call(tools_list, &backend, None).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InternalError);
        assert_eq!(err.message, "unexpected response type from backend");

        let err = call(prompts_list, &Fixed::new(None), None).unwrap_err();
        assert_eq!(err.message, "unexpected response type from backend");
    }

    #[test]
    fn tools_call_requires_name() {
        let backend = Fixed::new(None);
        for params in [
            None,
            Some(json!({})),
            Some(json!({"name": ""})),
            Some(json!({"name": null})),
        ] {
            let err = call(tools_call, &backend, params).unwrap_err();
            assert_eq!(err.code, McpErrorCode::InvalidParams);
            assert_eq!(err.message, "missing required parameter: name");
        }
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn tools_call_rejects_undecodable_params() {
        let err = call(tools_call, &Fixed::new(None), Some(json!([1, 2]))).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
        assert!(err.message.starts_with("invalid params: "));
    }

    #[test]
    fn tools_call_wrong_type_name_is_named() {
        let backend = Fixed::new(None);
        let err = call(tools_call, &backend, Some(json!({"name": 5}))).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
        assert!(
            err.message.starts_with("invalid params: name: invalid type"),
            "{}",
            err.message
        );

        let err = call(tools_call, &backend, Some(json!({"name": "x", "arguments": [1]})))
            .unwrap_err();
        assert!(err.message.starts_with("invalid params: arguments: "), "{}", err.message);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn tools_call_rejects_inexact_integers_before_sending() {
        let backend = Fixed::new(None);
        let err = call(
            tools_call,
            &backend,
            Some(json!({"name": "x", "arguments": {"big": 9_007_199_254_740_993_u64}})),
        )
        .unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
        assert!(err.message.starts_with("invalid arguments: big: "));
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn tools_call_builds_backend_request() {
        let backend = Fixed::new(Some(Response::ToolCall(ToolResponse::ok(
            Struct::new().with("text", "done"),
        ))));
        let result = call(
            tools_call,
            &backend,
            Some(json!({"name": "echo", "arguments": {"msg": "hi", "n": null}})),
        )
        .unwrap();
        assert_eq!(
            result,
            json!({"content": [{"type": "text", "text": "done"}], "isError": false})
        );

        let sent = backend.last();
        assert_eq!(sent.request_id, "stdio-tc-9");
        let Request::ToolCall(tool) = sent.request else {
            panic!("expected tool call");
        };
        assert_eq!(tool.tool_name, "echo");
        assert_eq!(tool.caller_plugin, "transport.stdio");
        let args = tool.arguments.unwrap();
        assert_eq!(args.get("msg"), Some(&Value::from("hi")));
        assert_eq!(args.get("n"), Some(&Value::Null));
    }

    #[test]
    fn tools_call_null_arguments_are_dropped() {
        let backend = Fixed::new(Some(Response::ToolCall(ToolResponse::ok(Struct::new()))));
        call(tools_call, &backend, Some(json!({"name": "x", "arguments": null}))).unwrap();
        let Request::ToolCall(tool) = backend.last().request else {
            panic!("expected tool call");
        };
        assert!(tool.arguments.is_none());
    }

    #[test]
    fn tool_result_rendering() {
        let failed = tool_result(&ToolResponse::failed("E_IO", "disk full"));
        assert!(failed.is_error);
        assert_eq!(failed.content[0].text, "disk full");

        let coded = tool_result(&ToolResponse::failed("E_IO", ""));
        assert_eq!(coded.content[0].text, "tool error: E_IO");

        let text = tool_result(&ToolResponse::ok(Struct::new().with("text", "hello")));
        assert!(!text.is_error);
        assert_eq!(text.content[0].text, "hello");

        let non_string = tool_result(&ToolResponse::ok(Struct::new().with("text", 5.0)));
        assert_eq!(non_string.content[0].text, "");

        let json = tool_result(&ToolResponse::ok(Struct::new().with("a", 1.0).with("b", "x")));
        assert_eq!(json.content[0].text, r#"{"a":1,"b":"x"}"#);

        let empty = tool_result(&ToolResponse {
            success: true,
            ..ToolResponse::default()
        });
        assert_eq!(empty.content.len(), 1);
        assert_eq!(empty.content[0].text, "");
    }

    #[test]
    fn prompts_get_forwards_messages() {
        let backend = Fixed::new(Some(Response::PromptGet(PromptGetResponse {
            description: "greeting".into(),
            messages: vec![
                BackendMessage {
                    role: "user".into(),
                    content: Some(ContentBlock {
                        kind: "text".into(),
                        text: "hi bob".into(),
                    }),
                },
                BackendMessage {
                    role: "assistant".into(),
                    content: None,
                },
            ],
        })));
        let result = call(
            prompts_get,
            &backend,
            Some(json!({"name": "greet", "arguments": {"who": "bob"}})),
        )
        .unwrap();
        assert_eq!(
            result,
            json!({
                "description": "greeting",
                "messages": [
                    {"role": "user", "content": {"type": "text", "text": "hi bob"}},
                    {"role": "assistant", "content": {"type": "", "text": ""}}
                ]
            })
        );

        let sent = backend.last();
        assert_eq!(sent.request_id, "stdio-pg-9");
        let Request::PromptGet(get) = sent.request else {
            panic!("expected prompt get");
        };
        assert_eq!(get.prompt_name, "greet");
        assert_eq!(get.arguments["who"], "bob");
    }

    #[test]
    fn prompts_get_rejects_non_string_arguments() {
        let err = call(
            prompts_get,
            &Fixed::new(None),
            Some(json!({"name": "p", "arguments": {"n": 1}})),
        )
        .unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
        assert!(
            err.message.starts_with("invalid params: arguments.n: invalid type"),
            "{}",
            err.message
        );
    }

    #[test]
    fn prompts_get_requires_name() {
        let backend = Fixed::new(None);
        for params in [Some(json!({"name": null})), Some(json!({"arguments": {}}))] {
            let err = call(prompts_get, &backend, params).unwrap_err();
            assert_eq!(err.message, "missing required parameter: name");
        }
        let err = call(prompts_get, &backend, Some(json!({"name": ["p"]}))).unwrap_err();
        assert!(err.message.starts_with("invalid params: name: "), "{}", err.message);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn prompt_definitions_keep_arguments() {
        let prompt = prompt_to_mcp(&PromptDefinition {
            name: "greet".into(),
            description: "say hi".into(),
            arguments: vec![mcpbridge_backend::PromptArgument {
                name: "who".into(),
                description: "name".into(),
                required: true,
            }],
        });
        assert_eq!(prompt.arguments.len(), 1);
        assert!(prompt.arguments[0].required);
    }
}
