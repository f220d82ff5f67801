//! Unified error types surfaced by the agent runtime.
//!
//! Only [`AgentError::ZoneUnauthorized`] is part of the agent's own contract;
//! the channel variants wrap failures of the async worker plumbing.
use thiserror::Error;
use tokio::sync::oneshot;

use autopilot_core::{Position, WorldError};

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("position {position} is outside every authorized zone")]
    ZoneUnauthorized { position: Position },

    #[error(transparent)]
    WorldUnavailable(#[from] WorldError),

    #[error("agent worker command channel closed")]
    CommandChannelClosed,

    #[error("agent worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("agent worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
