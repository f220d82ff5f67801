//! Action primitives the agent emits towards the host client.
//!
//! The host applies them asynchronously; their effects only become visible
//! in a later snapshot.

use crate::geometry::Position;
use crate::snapshot::EntityId;

/// A discrete request issued to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentAction {
    /// Use a consumable item by name (potions, runes, food).
    UseConsumable(String),
    /// Start attacking the given entity.
    Attack(EntityId),
    /// Travel to a position; the host performs pathfinding.
    MoveTo(Position),
    /// Speak an incantation (spells) or a phrase.
    Say(String),
}

impl AgentAction {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            AgentAction::UseConsumable(_) => "use_consumable",
            AgentAction::Attack(_) => "attack",
            AgentAction::MoveTo(_) => "move_to",
            AgentAction::Say(_) => "say",
        }
    }
}

/// What the survival monitor performs by default when a vital runs low.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Remedy {
    /// Use a consumable from the inventory.
    Item(String),
    /// Cast a healing spell by speaking its incantation.
    Incantation(String),
}

impl Remedy {
    pub fn to_action(&self) -> AgentAction {
        match self {
            Remedy::Item(name) => AgentAction::UseConsumable(name.clone()),
            Remedy::Incantation(words) => AgentAction::Say(words.clone()),
        }
    }
}

/// Optional action attached to a waypoint, executed on arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaypointAction {
    Say(String),
    UseConsumable(String),
}

impl From<&WaypointAction> for AgentAction {
    fn from(action: &WaypointAction) -> Self {
        match action {
            WaypointAction::Say(text) => AgentAction::Say(text.clone()),
            WaypointAction::UseConsumable(item) => AgentAction::UseConsumable(item.clone()),
        }
    }
}
