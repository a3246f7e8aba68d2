//! A [`Sender`] that talks to the backend over TCP.
//!
//! Every message is a frame: a 4-byte big-endian length followed by that many
//! bytes of JSON. One request frame is answered by one response frame on the
//! same connection.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, trace, warn};
use mcpbridge_core::logging::targets;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::plugin::{PluginRequest, PluginResponse};
use crate::sender::{SendError, Sender};

/// Default maximum frame size (10 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`TcpSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSenderConfig {
    /// Timeout for establishing a connection. `None` blocks indefinitely.
    pub connect_timeout: Option<Duration>,
    /// Read/write timeout for one round trip. `None` blocks indefinitely.
    pub request_timeout: Option<Duration>,
    /// Largest frame accepted or sent.
    pub max_frame_size: usize,
}

impl Default for TcpSenderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            request_timeout: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// A backend sender over a single TCP connection.
///
/// The connection is opened on first use (or eagerly via
/// [`TcpSender::connect`]) and dropped after any I/O failure, so the next call
/// reconnects. A failed call is never retried.
#[derive(Debug)]
pub struct TcpSender {
    addr: String,
    config: TcpSenderConfig,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpSender {
    /// Creates a sender that connects lazily.
    #[must_use]
    pub fn new(addr: impl Into<String>, config: TcpSenderConfig) -> Self {
        Self {
            addr: addr.into(),
            config,
            stream: Mutex::new(None),
        }
    }

    /// Creates a sender and opens the connection immediately.
    pub fn connect(addr: impl Into<String>, config: TcpSenderConfig) -> io::Result<Self> {
        let sender = Self::new(addr, config);
        let stream = sender.open()?;
        *sender.stream.lock().unwrap_or_else(PoisonError::into_inner) = Some(stream);
        Ok(sender)
    }

    /// The configured backend address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn open(&self) -> io::Result<TcpStream> {
        let mut last_error = None;
        for addr in resolve(&self.addr)? {
            match self.open_addr(addr) {
                Ok(stream) => {
                    debug!(target: targets::BACKEND, "connected to backend at {addr}");
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(target: targets::BACKEND, "connect to {addr} failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
        }))
    }

    fn open_addr(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = match self.config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.config.request_timeout)?;
        stream.set_write_timeout(self.config.request_timeout)?;
        Ok(stream)
    }

    fn round_trip(
        &self,
        stream: &mut TcpStream,
        request: &PluginRequest,
    ) -> Result<PluginResponse, SendError> {
        write_frame(stream, request, self.config.max_frame_size)?;
        read_frame(stream, self.config.max_frame_size)
    }
}

impl Sender for TcpSender {
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
        let mut guard = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let Some(stream) = guard.as_mut() else {
            return Err(SendError::Closed);
        };

        trace!(
            target: targets::BACKEND,
            "-> {} {}",
            request.request_id,
            request.request.operation()
        );
        match self.round_trip(stream, request) {
            Ok(response) if response.request_id == request.request_id => {
                trace!(target: targets::BACKEND, "<- {}", response.request_id);
                Ok(response)
            }
            Ok(response) => {
                // The stream is out of step with our requests.
                *guard = None;
                Err(SendError::Mismatch {
                    expected: request.request_id.clone(),
                    actual: response.request_id,
                })
            }
            Err(e) => {
                if !matches!(e, SendError::Encode(_)) {
                    warn!(target: targets::BACKEND, "dropping backend connection: {e}");
                    *guard = None;
                }
                Err(e)
            }
        }
    }
}

fn resolve(addr: &str) -> io::Result<Vec<SocketAddr>> {
    Ok(addr.to_socket_addrs()?.collect())
}

/// Writes one length-prefixed JSON frame.
pub fn write_frame<W: Write, T: Serialize>(
    writer: &mut W,
    message: &T,
    max_frame_size: usize,
) -> Result<(), SendError> {
    let body = serde_json::to_vec(message).map_err(SendError::Encode)?;
    if body.len() > max_frame_size {
        return Err(SendError::FrameTooLarge(body.len()));
    }
    let len = u32::try_from(body.len()).map_err(|_| SendError::FrameTooLarge(body.len()))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Reads one length-prefixed JSON frame.
///
/// End of stream before the length prefix is [`SendError::Closed`].
pub fn read_frame<R: Read, T: DeserializeOwned>(
    reader: &mut R,
    max_frame_size: usize,
) -> Result<T, SendError> {
    let mut header = [0u8; 4];
    if let Err(e) = reader.read_exact(&mut header) {
        return Err(if e.kind() == io::ErrorKind::UnexpectedEof {
            SendError::Closed
        } else {
            SendError::Io(e)
        });
    }
    let len = u32::from_be_bytes(header) as usize;
    if len > max_frame_size {
        return Err(SendError::FrameTooLarge(len));
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    serde_json::from_slice(&body).map_err(SendError::Decode)
}
