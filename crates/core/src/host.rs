//! World interface supplied by the host client.
//!
//! The host owns the live world exclusively. The agent reads it through
//! [`WorldView`] (fresh snapshots, valid for one tick) and writes to it only
//! through the discrete primitives of [`ActionSink`].

use thiserror::Error;

use crate::action::AgentAction;
use crate::geometry::Position;
use crate::snapshot::{CharacterSnapshot, EntityId, EntitySnapshot};

/// Failure to read world state. The whole tick is skipped when this occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("world interface unavailable: {reason}")]
    Unavailable { reason: String },
}

impl WorldError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Failure reported by the host when applying an action primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("consumable {item:?} is not available")]
    ConsumableUnavailable { item: String },

    #[error("host rejected {action}: {reason}")]
    Rejected {
        action: &'static str,
        reason: String,
    },
}

/// Read side of the world interface.
pub trait WorldView {
    /// Snapshot of the local character.
    fn character(&self) -> Result<CharacterSnapshot, WorldError>;

    /// Entities the host considers near `position` within `radius` tiles.
    ///
    /// The order of the returned list is the scan order used for tie-breaking.
    fn nearby_entities(
        &self,
        position: Position,
        radius: u32,
    ) -> Result<Vec<EntitySnapshot>, WorldError>;

    /// Current snapshot of a single entity, or `None` if it no longer exists.
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;
}

/// Write side of the world interface.
pub trait ActionSink {
    fn use_consumable(&mut self, item: &str) -> Result<(), ActionError>;

    fn issue_attack(&mut self, target: EntityId) -> Result<(), ActionError>;

    /// The host performs pathfinding and travel.
    fn issue_move_to(&mut self, destination: Position) -> Result<(), ActionError>;

    fn say_incantation(&mut self, text: &str) -> Result<(), ActionError>;
}

/// Full host capability: read snapshots and accept action primitives.
pub trait Host: WorldView + ActionSink {}

impl<T: WorldView + ActionSink + ?Sized> Host for T {}

/// Route an [`AgentAction`] to the matching primitive on the sink.
pub fn dispatch<S>(sink: &mut S, action: &AgentAction) -> Result<(), ActionError>
where
    S: ActionSink + ?Sized,
{
    match action {
        AgentAction::UseConsumable(item) => sink.use_consumable(item),
        AgentAction::Attack(target) => sink.issue_attack(*target),
        AgentAction::MoveTo(destination) => sink.issue_move_to(*destination),
        AgentAction::Say(text) => sink.say_incantation(text),
    }
}
