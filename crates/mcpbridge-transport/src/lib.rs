//! Stdio framing for the bridge.
//!
//! Input is newline-delimited JSON: one request per line, blank lines
//! ignored. Output is one response per line. The [`LineReader`] and
//! [`ResponseWriter`] halves are independent so the run loop can own both.

#![forbid(unsafe_code)]

mod codec;
mod stdio;

pub use codec::{Codec, CodecError, DEFAULT_MAX_MESSAGE_SIZE, encode_response, parse_line};
pub use stdio::{LineReader, ResponseWriter};

use std::fmt;
use std::io;

/// A fatal fault on the input or output stream.
#[derive(Debug)]
pub enum TransportError {
    /// The underlying stream failed.
    Io(io::Error),
    /// A line was too large or a response could not be encoded.
    Codec(CodecError),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io(e) => write!(f, "I/O error: {e}"),
            TransportError::Codec(e) => write!(f, "codec error: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            TransportError::Codec(e) => Some(e),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        TransportError::Io(err)
    }
}

impl From<CodecError> for TransportError {
    fn from(err: CodecError) -> Self {
        TransportError::Codec(err)
    }
}
