//! Structured logging for mcpbridge.
//!
//! Every crate logs through the standard [`log`] facade. The library crates
//! never install a logger; the `mcpbridge` binary installs a stderr logger so
//! stdout stays reserved for protocol output.
//!
//! # Log Levels
//!
//! - **error**: Fatal stream faults that end the run loop
//! - **warn**: Dropped or malformed input, backend failures
//! - **info**: Lifecycle events and client notifications
//! - **debug**: Request flow, handler invocations
//! - **trace**: Wire-level payloads
//!
//! # Log Targets
//!
//! - `mcpbridge`: Root target
//! - `mcpbridge::bridge`: Run loop lifecycle
//! - `mcpbridge::transport`: Line reader and response writer
//! - `mcpbridge::router`: Method dispatch
//! - `mcpbridge::handler`: Handler execution
//! - `mcpbridge::backend`: Backend round trips
//! - `mcpbridge::codec`: JSON encoding/decoding
//!
//! Example filter: `MCPBRIDGE_LOG=debug`

pub use log::{debug, error, info, trace, warn};

pub use log::{Level, LevelFilter};

/// Log targets used by mcpbridge components.
pub mod targets {
    /// Root target for all mcpbridge logs.
    pub const MCPBRIDGE: &str = "mcpbridge";

    /// Run loop lifecycle.
    pub const BRIDGE: &str = "mcpbridge::bridge";

    /// Line reader and response writer.
    pub const TRANSPORT: &str = "mcpbridge::transport";

    /// Method dispatch.
    pub const ROUTER: &str = "mcpbridge::router";

    /// Handler execution.
    pub const HANDLER: &str = "mcpbridge::handler";

    /// Backend round trips.
    pub const BACKEND: &str = "mcpbridge::backend";

    /// JSON encoding and decoding.
    pub const CODEC: &str = "mcpbridge::codec";
}

/// Returns whether logging is enabled at the given level for the given target.
#[inline]
#[must_use]
pub fn is_enabled(level: Level, target: &str) -> bool {
    log::log_enabled!(target: target, level)
}

/// Logs a run loop lifecycle event at INFO level.
#[macro_export]
macro_rules! log_bridge {
    ($($arg:tt)*) => {
        $crate::logging::info!(target: $crate::logging::targets::BRIDGE, $($arg)*)
    };
}

/// Logs a transport event at DEBUG level.
#[macro_export]
macro_rules! log_transport {
    ($($arg:tt)*) => {
        $crate::logging::debug!(target: $crate::logging::targets::TRANSPORT, $($arg)*)
    };
}

/// Logs a routing event at DEBUG level.
#[macro_export]
macro_rules! log_router {
    ($($arg:tt)*) => {
        $crate::logging::debug!(target: $crate::logging::targets::ROUTER, $($arg)*)
    };
}

/// Logs a handler event at DEBUG level.
#[macro_export]
macro_rules! log_handler {
    ($($arg:tt)*) => {
        $crate::logging::debug!(target: $crate::logging::targets::HANDLER, $($arg)*)
    };
}
