//! Message codec for framing JSON-RPC messages.
//!
//! One request per line in, one response per line out.

use mcpbridge_protocol::{JsonRpcRequest, JsonRpcResponse};

/// Default maximum line size (10 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Codec for decoding requests and encoding responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    max_message_size: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// Creates a codec with the default 10 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Creates a codec with a custom line limit.
    #[must_use]
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self { max_message_size }
    }

    /// Returns the maximum allowed line size in bytes.
    #[must_use]
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Parses one trimmed, non-blank line into a request envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MessageTooLarge`] if the line exceeds the limit,
    /// or [`CodecError::Json`] if it is not a valid request object.
    pub fn decode_request(&self, line: &[u8]) -> Result<JsonRpcRequest, CodecError> {
        if line.len() > self.max_message_size {
            return Err(CodecError::MessageTooLarge(line.len()));
        }
        parse_line(line)
    }

    /// Encodes a response as one `\n`-terminated line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode_response(&self, response: &JsonRpcResponse) -> Result<Vec<u8>, CodecError> {
        encode_response(response)
    }
}

/// Parses one line into a request envelope without a size check.
///
/// # Errors
///
/// Returns [`CodecError::Json`] carrying the decoder's error.
pub fn parse_line(line: &[u8]) -> Result<JsonRpcRequest, CodecError> {
    Ok(serde_json::from_slice(line)?)
}

/// Encodes a response as one `\n`-terminated line.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_response(response: &JsonRpcResponse) -> Result<Vec<u8>, CodecError> {
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Codec error types.
#[derive(Debug)]
pub enum CodecError {
    /// JSON parsing or serialization error.
    Json(serde_json::Error),
    /// Line exceeds the size limit.
    MessageTooLarge(usize),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Json(e) => write!(f, "{e}"),
            CodecError::MessageTooLarge(size) => write!(f, "message too large: {size} bytes"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(e) => Some(e),
            CodecError::MessageTooLarge(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err)
    }
}
