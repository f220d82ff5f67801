//! Collaborator-supplied reactions to agent events.
//!
//! Handlers never touch the host directly. They return the action primitives
//! they want performed and the agent dispatches them, which lets the agent
//! drop them when it is already cancelled.
use autopilot_core::AgentAction;

use crate::events::AgentEvent;

/// Reaction to a single event kind.
///
/// For `HealthLow`/`ManaLow` the returned actions fully replace the default
/// remedy, even when the list is empty. For every other kind the handler is
/// a notification and the returned actions are performed in addition to the
/// agent's own behavior.
pub trait EventHandler: Send {
    fn handle(&mut self, event: &AgentEvent) -> Vec<AgentAction>;
}

impl<F> EventHandler for F
where
    F: FnMut(&AgentEvent) -> Vec<AgentAction> + Send,
{
    fn handle(&mut self, event: &AgentEvent) -> Vec<AgentAction> {
        self(event)
    }
}
