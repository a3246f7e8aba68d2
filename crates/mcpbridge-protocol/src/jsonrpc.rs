//! JSON-RPC 2.0 message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only protocol version the bridge accepts and emits.
pub const JSONRPC_VERSION: &str = "2.0";

fn default_version() -> String {
    JSONRPC_VERSION.to_owned()
}

/// JSON-RPC request ID.
///
/// Numbers are kept as [`serde_json::Number`] so a fractional or very large
/// id is echoed exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric ID.
    Number(serde_json::Number),
    /// String ID.
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id.into())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_owned())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
        }
    }
}

/// JSON-RPC 2.0 request.
///
/// A missing `jsonrpc` member decodes as `"2.0"`; an explicit other value is
/// kept so the dispatcher can reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version.
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Request parameters. `null` decodes as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request ID. Absent or `null` marks a notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    /// Returns true if the version tag is the supported one.
    #[must_use]
    pub fn has_supported_version(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<mcpbridge_core::McpError> for JsonRpcError {
    fn from(err: mcpbridge_core::McpError) -> Self {
        Self {
            code: err.code.into(),
            message: err.message,
            data: err.data,
        }
    }
}

/// JSON-RPC 2.0 response.
///
/// Exactly one of `result` and `error` is set by the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version (always "2.0").
    pub jsonrpc: String,
    /// Result (present on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (present on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Request ID this is responding to; `null` when it could not be read.
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    /// Creates a success response.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// Creates an error response.
    #[must_use]
    pub fn error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: default_version(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpbridge_core::McpError;
    use serde_json::json;

    #[test]
    fn request_id_keeps_json_type() {
        let num: RequestId = serde_json::from_value(json!(7)).unwrap();
        let text: RequestId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(num, RequestId::from(7));
        assert_eq!(text, RequestId::from("7"));
        assert_eq!(serde_json::to_value(&num).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("7"));
    }

    #[test]
    fn fractional_id_is_echoed_verbatim() {
        let id: RequestId = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(1.5));
        assert_eq!(id.to_string(), "1.5");
    }

    #[test]
    fn request_id_display() {
        assert_eq!(RequestId::from(42).to_string(), "42");
        assert_eq!(RequestId::from("abc").to_string(), "abc");
    }

    #[test]
    fn null_id_is_a_notification() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(req.id.is_none());
    }

    #[test]
    fn missing_version_defaults() {
        let req: JsonRpcRequest = serde_json::from_str(r#"{"id":1,"method":"ping"}"#).unwrap();
        assert!(req.has_supported_version());
    }

    #[test]
    fn explicit_foreign_version_is_kept() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#).unwrap();
        assert_eq!(req.jsonrpc, "1.0");
        assert!(!req.has_supported_version());
    }

    #[test]
    fn null_params_decode_as_absent() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"ping","params":null}"#)
                .unwrap();
        assert!(req.params.is_none());
    }

    #[test]
    fn success_response_shape() {
        let resp = JsonRpcResponse::success(RequestId::from(1), json!({}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "result": {}, "id": 1}));
    }

    #[test]
    fn error_response_with_null_id() {
        let resp = JsonRpcResponse::error(None, McpError::parse_error("eof").into());
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32700, "message": "parse error: eof"},
                "id": null
            })
        );
    }
}
