//! Topic-based event bus for agent events.
//!
//! This module provides a flexible event system where events are published to
//! specific topics, and consumers can subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{AgentEvent, EventKind, HostSignal, StopReason};
