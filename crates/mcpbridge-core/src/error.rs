//! Protocol-level error types.
//!
//! Every failure a handler can report to the client is an [`McpError`]. The
//! code determines the JSON-RPC `error.code`; the message is sent verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON-RPC error codes used by the bridge.
///
/// All codes live in the reserved JSON-RPC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum McpErrorCode {
    /// Invalid JSON was received (-32700).
    ParseError,
    /// The JSON sent is not a valid request object (-32600).
    InvalidRequest,
    /// The method does not exist (-32601).
    MethodNotFound,
    /// Invalid method parameters (-32602).
    InvalidParams,
    /// Internal error, including backend failures (-32603).
    InternalError,
}

impl McpErrorCode {
    /// Returns the numeric JSON-RPC code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    /// Returns a short human-readable name for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse error",
            Self::InvalidRequest => "invalid request",
            Self::MethodNotFound => "method not found",
            Self::InvalidParams => "invalid params",
            Self::InternalError => "internal error",
        }
    }
}

impl From<McpErrorCode> for i32 {
    fn from(code: McpErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<i32> for McpErrorCode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -32700 => Ok(Self::ParseError),
            -32600 => Ok(Self::InvalidRequest),
            -32601 => Ok(Self::MethodNotFound),
            -32602 => Ok(Self::InvalidParams),
            -32603 => Ok(Self::InternalError),
            other => Err(format!("unknown error code: {other}")),
        }
    }
}

impl fmt::Display for McpErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

/// An error reported to the client as a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq)]
pub struct McpError {
    /// Error code.
    pub code: McpErrorCode,
    /// Message sent to the client.
    pub message: String,
    /// Optional structured data.
    pub data: Option<serde_json::Value>,
}

impl McpError {
    /// Creates an error with the given code and message.
    #[must_use]
    pub fn new(code: McpErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// A framing failure. The message is prefixed with `parse error: `.
    #[must_use]
    pub fn parse_error(detail: impl fmt::Display) -> Self {
        Self::new(McpErrorCode::ParseError, format!("parse error: {detail}"))
    }

    /// A request object that is not valid JSON-RPC.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(McpErrorCode::InvalidRequest, message)
    }

    /// An unrecognized method name.
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            McpErrorCode::MethodNotFound,
            format!("method not found: {method}"),
        )
    }

    /// Parameters that failed validation.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(McpErrorCode::InvalidParams, message)
    }

    /// An internal failure, including a failed backend round trip.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(McpErrorCode::InternalError, message)
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for McpError {}

/// Result alias for handler operations.
pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_jsonrpc_reserved_values() {
        assert_eq!(i32::from(McpErrorCode::ParseError), -32700);
        assert_eq!(i32::from(McpErrorCode::InvalidRequest), -32600);
        assert_eq!(i32::from(McpErrorCode::MethodNotFound), -32601);
        assert_eq!(i32::from(McpErrorCode::InvalidParams), -32602);
        assert_eq!(i32::from(McpErrorCode::InternalError), -32603);
    }

    #[test]
    fn code_try_from_rejects_unknown() {
        assert_eq!(
            McpErrorCode::try_from(-32601),
            Ok(McpErrorCode::MethodNotFound)
        );
        assert!(McpErrorCode::try_from(-1).is_err());
    }

    #[test]
    fn code_serializes_as_integer() {
        let json = serde_json::to_value(McpErrorCode::InvalidParams).unwrap();
        assert_eq!(json, serde_json::json!(-32602));
    }

    #[test]
    fn constructors_format_messages() {
        assert_eq!(
            McpError::parse_error("expected value at line 1").message,
            "parse error: expected value at line 1"
        );
        assert_eq!(
            McpError::method_not_found("foo/bar").message,
            "method not found: foo/bar"
        );
        let err = McpError::invalid_params("missing required parameter: name");
        assert_eq!(err.code, McpErrorCode::InvalidParams);
        assert!(err.data.is_none());
    }

    #[test]
    fn display_includes_code() {
        let err = McpError::internal_error("boom");
        assert_eq!(err.to_string(), "[-32603] boom");
    }
}
