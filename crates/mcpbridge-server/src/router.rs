//! Method dispatch table.

use std::collections::HashMap;

use mcpbridge_core::{McpResult, log_router};

use crate::context::RequestContext;
use crate::handlers;

/// Prefix of client notifications that are accepted without a handler.
pub const NOTIFICATION_PREFIX: &str = "notifications/";

/// A boxed method handler.
pub type Handler =
    Box<dyn Fn(&RequestContext<'_>) -> McpResult<serde_json::Value> + Send + Sync>;

/// Where a method name leads.
pub enum Route<'a> {
    /// A registered handler.
    Handler(&'a Handler),
    /// An unhandled `notifications/*` method; accepted silently.
    Notification,
    /// Anything else.
    Unknown,
}

impl std::fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Handler(_) => f.write_str("Handler"),
            Route::Notification => f.write_str("Notification"),
            Route::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Maps method names to handlers.
///
/// Exact matches win over the notification prefix, so a registered
/// `notifications/...` handler is still dispatched.
pub struct Router {
    handlers: HashMap<&'static str, Handler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}

impl Router {
    /// Creates a router with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Creates a router serving the full bridge method surface.
    #[must_use]
    pub fn with_default_handlers() -> Self {
        let mut router = Self::new();
        router.register("initialize", handlers::initialize);
        router.register("ping", handlers::ping);
        router.register("tools/list", handlers::tools_list);
        router.register("tools/call", handlers::tools_call);
        router.register("prompts/list", handlers::prompts_list);
        router.register("prompts/get", handlers::prompts_get);
        router
    }

    /// Registers a handler, replacing any existing one for the method.
    pub fn register<F>(&mut self, method: &'static str, handler: F)
    where
        F: Fn(&RequestContext<'_>) -> McpResult<serde_json::Value> + Send + Sync + 'static,
    {
        if self.handlers.insert(method, Box::new(handler)).is_some() {
            log_router!("replaced handler for {method}");
        }
    }

    /// Resolves a method name.
    #[must_use]
    pub fn route(&self, method: &str) -> Route<'_> {
        if let Some(handler) = self.handlers.get(method) {
            Route::Handler(handler)
        } else if method.starts_with(NOTIFICATION_PREFIX) {
            Route::Notification
        } else {
            Route::Unknown
        }
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        let mut methods: Vec<_> = self.handlers.keys().copied().collect();
        methods.sort_unstable();
        methods
    }
}
