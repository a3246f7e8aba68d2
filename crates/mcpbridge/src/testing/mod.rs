//! Testing utilities for code built on the bridge.
//!
//! Provides [`MockSender`] for scripting backend replies and helpers for
//! driving [`Bridge::run`](crate::Bridge::run) over in-memory streams.

mod mock_sender;
mod session;

pub use mock_sender::MockSender;
pub use session::{parse_responses, run_lines};
