//! Runtime orchestration for the zone-gated autopilot agent.
//!
//! This crate wires the pure decision policies from `autopilot-core` into an
//! agent that ticks on a timer, reacts to collaborator handlers, and reports
//! what it does on a topic-based event bus. Consumers either embed
//! [`AgentContext`] and drive ticks themselves, or spawn an [`AgentRuntime`]
//! and interact with it through [`AgentHandle`].
//!
//! Modules are organized by responsibility:
//! - [`context`] holds the agent and its tick state machine
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`scheduler`] abstracts deferred re-invocation of the tick
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod context;
pub mod events;
pub mod metrics;
pub mod runtime;
pub mod scheduler;

mod workers;

pub use api::{AgentError, AgentHandle, EventHandler, HandlerRegistry, Result};
pub use config::RuntimeConfig;
pub use context::{AgentContext, AgentStatus, RunState, TickOutcome};
pub use events::{AgentEvent, EventBus, EventKind, HostSignal, StopReason, Topic};
pub use metrics::{AgentMetrics, MetricsSnapshot};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder};
pub use scheduler::{ManualScheduler, Scheduler};
