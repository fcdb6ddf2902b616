//! Caller-facing facade: configuration, blocking calls and the async handle.
mod config;
mod handle;
mod planner;

pub use config::*;
pub use handle::*;
pub use planner::*;
