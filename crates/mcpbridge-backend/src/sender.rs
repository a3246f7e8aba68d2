//! The backend round-trip abstraction.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::plugin::{PluginRequest, PluginResponse};

/// Performs one synchronous request/response round trip with the backend.
///
/// Implementations must be safe to share; the bridge calls `send` from a
/// single thread but holds the sender for the whole run.
pub trait Sender: Send + Sync {
    /// Sends a request and waits for its response.
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError>;
}

impl<S: Sender + ?Sized> Sender for &S {
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
        (**self).send(request)
    }
}

impl<S: Sender + ?Sized> Sender for Box<S> {
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
        (**self).send(request)
    }
}

impl<S: Sender + ?Sized> Sender for Arc<S> {
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
        (**self).send(request)
    }
}

/// A failed backend round trip.
#[derive(Debug)]
pub enum SendError {
    /// Socket-level failure.
    Io(io::Error),
    /// The request could not be serialized.
    Encode(serde_json::Error),
    /// The response could not be deserialized.
    Decode(serde_json::Error),
    /// A frame exceeded the configured limit.
    FrameTooLarge(usize),
    /// The backend closed the connection.
    Closed,
    /// The response answered a different request.
    Mismatch {
        /// Correlation id that was sent.
        expected: String,
        /// Correlation id that came back.
        actual: String,
    },
    /// Any other failure, described by its message.
    Other(String),
}

impl SendError {
    /// Creates an [`SendError::Other`] from a message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        SendError::Other(message.into())
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Io(e) => write!(f, "{e}"),
            SendError::Encode(e) => write!(f, "encode request: {e}"),
            SendError::Decode(e) => write!(f, "decode response: {e}"),
            SendError::FrameTooLarge(size) => write!(f, "frame too large: {size} bytes"),
            SendError::Closed => write!(f, "connection closed by backend"),
            SendError::Mismatch { expected, actual } => write!(
                f,
                "response id mismatch: expected {expected}, got {actual}"
            ),
            SendError::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SendError::Io(e) => Some(e),
            SendError::Encode(e) | SendError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SendError {
    fn from(err: io::Error) -> Self {
        SendError::Io(err)
    }
}
