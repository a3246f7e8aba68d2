//! A closure-backed backend for tests.

use std::sync::{Mutex, PoisonError};

use mcpbridge_backend::{PluginRequest, PluginResponse, Request, Response, SendError, Sender};

type Reply = dyn Fn(&PluginRequest) -> Result<PluginResponse, SendError> + Send + Sync;

/// A [`Sender`] whose replies come from a closure.
///
/// Every request is recorded, so tests can assert on what the bridge sent.
///
/// # Example
///
/// ```ignore
/// let backend = MockSender::responding(|request| match request {
///     Request::ListTools(_) => Response::ListTools(ListToolsResponse::default()),
///     _ => unreachable!(),
/// });
/// let bridge = Bridge::new(&backend);
/// ```
pub struct MockSender {
    reply: Box<Reply>,
    requests: Mutex<Vec<PluginRequest>>,
}

impl std::fmt::Debug for MockSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSender")
            .field("requests", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl MockSender {
    /// Replies with whatever the closure returns.
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&PluginRequest) -> Result<PluginResponse, SendError> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the closure's response under the request's own id.
    pub fn responding<F>(respond: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        Self::new(move |request| {
            Ok(PluginResponse::new(
                request.request_id.clone(),
                respond(&request.request),
            ))
        })
    }

    /// Fails every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| Err(SendError::other(message.clone())))
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<PluginRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Sender for MockSender {
    fn send(&self, request: &PluginRequest) -> Result<PluginResponse, SendError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        (self.reply)(request)
    }
}
