//! Worker task that backs the runtime orchestration.
//!
//! The agent worker owns the [`AgentContext`](crate::AgentContext) and the
//! host, serializing commands and timer-driven ticks onto a single task.

mod agent;

pub use agent::{AgentWorker, Command};
