//! Immutable single-tick copies of world state.
//!
//! Snapshots are handed to the agent by value once per tick and must never be
//! retained across ticks; the host owns the live world.

use crate::geometry::{Position, percentage};

/// Unique identifier for any creature or player the host knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The local character as seen at the start of a tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub id: EntityId,
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
}

impl CharacterSnapshot {
    /// Health as a percentage, or `None` when max health is 0.
    pub fn health_percent(&self) -> Option<f32> {
        percentage(self.health, self.max_health)
    }

    /// Mana as a percentage, or `None` when max mana is 0.
    pub fn mana_percent(&self) -> Option<f32> {
        percentage(self.mana, self.max_mana)
    }
}

/// A nearby creature or player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    /// Current health in range [0, 100].
    pub health_percent: f32,
    pub is_player: bool,
}

impl EntitySnapshot {
    pub fn new(id: EntityId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            health_percent: 100.0,
            is_player: false,
        }
    }

    pub fn with_health(mut self, health_percent: f32) -> Self {
        self.health_percent = health_percent;
        self
    }

    pub fn as_player(mut self) -> Self {
        self.is_player = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health_percent > 0.0
    }
}
