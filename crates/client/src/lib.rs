//! Composition root for running the autopilot against a simulated world.
//!
//! The binary loads an [`AgentProfile`], builds a [`SimulatedHost`] from it,
//! and drives an [`autopilot_runtime::AgentRuntime`] for a bounded session
//! while streaming every agent event to the log.

pub mod config;
pub mod logging;
pub mod profile;
pub mod session;
pub mod sim;

pub use config::ClientConfig;
pub use profile::AgentProfile;
pub use session::{SessionReport, run_session};
pub use sim::SimulatedHost;
