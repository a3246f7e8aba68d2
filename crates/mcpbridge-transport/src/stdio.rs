//! Line reader and response writer over arbitrary byte streams.
//!
//! The run loop uses these over stdin/stdout; tests use `Cursor` and
//! `Vec<u8>`.
//!
//! # Wire Format
//!
//! - Each message is a single line of JSON terminated by `\n`
//! - Surrounding whitespace (including a trailing `\r`) is trimmed
//! - Blank lines are skipped
//! - A line longer than the limit is a fatal fault

use std::io::{BufRead, Read, Write};
use std::sync::{Mutex, PoisonError};

use log::trace;
use mcpbridge_core::log_transport;
use mcpbridge_core::logging::{Level, is_enabled, targets};
use mcpbridge_protocol::JsonRpcResponse;

use crate::codec::{Codec, CodecError, encode_response};
use crate::TransportError;

/// Reads trimmed, non-blank lines from a buffered reader.
///
/// Never buffers more than the line limit plus one byte for a single line.
pub struct LineReader<R> {
    reader: R,
    max_line_size: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Creates a reader with the default 10 MiB limit.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_codec(reader, &Codec::new())
    }

    /// Creates a reader that enforces the codec's line limit.
    #[must_use]
    pub fn with_codec(reader: R, codec: &Codec) -> Self {
        Self {
            reader,
            max_line_size: codec.max_message_size(),
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Returns the next non-blank line with surrounding whitespace removed,
    /// or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the stream fails, or
    /// [`CodecError::MessageTooLarge`] if a line exceeds the limit.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>, TransportError> {
        loop {
            self.buffer.clear();
            let limit = self.max_line_size as u64 + 1;
            let read = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buffer)?;
            if read == 0 {
                return Ok(None);
            }

            let content_len = if self.buffer.last() == Some(&b'\n') {
                self.buffer.len() - 1
            } else {
                self.buffer.len()
            };
            if content_len > self.max_line_size {
                log_transport!(
                    "line exceeds {} bytes, stopping reader",
                    self.max_line_size
                );
                return Err(CodecError::MessageTooLarge(content_len).into());
            }

            if !self.buffer.trim_ascii().is_empty() {
                break;
            }
        }
        let line = self.buffer.trim_ascii();
        if is_enabled(Level::Trace, targets::TRANSPORT) {
            trace!(target: targets::TRANSPORT, "<- {}", String::from_utf8_lossy(line));
        }
        Ok(Some(line))
    }
}

/// Writes responses as single lines, one locked write per response.
pub struct ResponseWriter<W> {
    writer: Mutex<W>,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps a writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Encodes and writes one response line, then flushes.
    ///
    /// The response is fully encoded before the lock is taken, so an encoding
    /// failure writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Codec`] if encoding fails, or
    /// [`TransportError::Io`] if the write fails.
    pub fn write_response(&self, response: &JsonRpcResponse) -> Result<(), TransportError> {
        let bytes = encode_response(response)?;
        if is_enabled(Level::Trace, targets::TRANSPORT) {
            trace!(
                target: targets::TRANSPORT,
                "-> {}",
                String::from_utf8_lossy(&bytes[..bytes.len() - 1])
            );
        }
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
