//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration or workers.

pub mod errors;
pub mod handle;
pub mod handlers;
pub mod registry;

pub use errors::{AgentError, Result};
pub use handle::AgentHandle;
pub use handlers::EventHandler;
pub use registry::HandlerRegistry;
