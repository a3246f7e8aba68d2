//! Core types shared by every mcpbridge crate.
//!
//! This crate provides the fundamental building blocks:
//! - [`McpError`] and [`McpErrorCode`], the protocol-level error model
//! - [`CancellationToken`], the cooperative stop flag for the run loop
//! - Hierarchical logging targets and helper macros
//!
//! Nothing here performs I/O.

#![forbid(unsafe_code)]

mod cancel;
mod error;
pub mod logging;

pub use cancel::CancellationToken;
pub use error::{McpError, McpErrorCode, McpResult};
