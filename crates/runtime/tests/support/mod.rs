//! Recording fake host shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;

use autopilot_core::{
    ActionError, ActionSink, AgentAction, CharacterSnapshot, EntityId, EntitySnapshot, Position,
    WorldError, WorldView, ZoneBounds, ZoneRegistry,
};

pub const FLOOR: u8 = 7;

/// World fixture that records every primitive the agent issues.
pub struct FakeHost {
    pub character: CharacterSnapshot,
    pub entities: Vec<EntitySnapshot>,
    /// Fail `character()` while set.
    pub offline: bool,
    /// Fail `nearby_entities()` while set.
    pub scan_fails: bool,
    pub out_of_stock: HashSet<String>,
    pub actions: Vec<AgentAction>,
}

impl FakeHost {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            character: CharacterSnapshot {
                id: EntityId(1),
                position: Position::new(x, y, FLOOR),
                health: 100,
                max_health: 100,
                mana: 100,
                max_mana: 100,
            },
            entities: Vec::new(),
            offline: false,
            scan_fails: false,
            out_of_stock: HashSet::new(),
            actions: Vec::new(),
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32, z: u8) {
        self.character.position = Position::new(x, y, z);
    }

    pub fn set_health(&mut self, health: u32) {
        self.character.health = health;
    }

    pub fn set_mana(&mut self, mana: u32) {
        self.character.mana = mana;
    }

    pub fn spawn(&mut self, id: u32, name: &str, x: i32, y: i32) {
        self.entities
            .push(EntitySnapshot::new(EntityId(id), name, Position::new(x, y, FLOOR)));
    }

    pub fn kill(&mut self, id: u32) {
        if let Some(entity) = self.entities.iter_mut().find(|e| e.id == EntityId(id)) {
            entity.health_percent = 0.0;
        }
    }

    /// Take and clear the recorded actions.
    pub fn take_actions(&mut self) -> Vec<AgentAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn count(&self, predicate: impl Fn(&AgentAction) -> bool) -> usize {
        self.actions.iter().filter(|action| predicate(action)).count()
    }
}

impl WorldView for FakeHost {
    fn character(&self) -> Result<CharacterSnapshot, WorldError> {
        if self.offline {
            return Err(WorldError::unavailable("client offline"));
        }
        Ok(self.character.clone())
    }

    fn nearby_entities(
        &self,
        position: Position,
        radius: u32,
    ) -> Result<Vec<EntitySnapshot>, WorldError> {
        if self.scan_fails {
            return Err(WorldError::unavailable("entity scan failed"));
        }
        Ok(self
            .entities
            .iter()
            .filter(|entity| autopilot_core::manhattan_distance(position, entity.position) <= radius)
            .cloned()
            .collect())
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.iter().find(|entity| entity.id == id).cloned()
    }
}

impl ActionSink for FakeHost {
    fn use_consumable(&mut self, item: &str) -> Result<(), ActionError> {
        if self.out_of_stock.contains(item) {
            return Err(ActionError::ConsumableUnavailable { item: item.into() });
        }
        self.actions.push(AgentAction::UseConsumable(item.into()));
        Ok(())
    }

    fn issue_attack(&mut self, target: EntityId) -> Result<(), ActionError> {
        self.actions.push(AgentAction::Attack(target));
        Ok(())
    }

    fn issue_move_to(&mut self, destination: Position) -> Result<(), ActionError> {
        self.actions.push(AgentAction::MoveTo(destination));
        Ok(())
    }

    fn say_incantation(&mut self, text: &str) -> Result<(), ActionError> {
        self.actions.push(AgentAction::Say(text.into()));
        Ok(())
    }
}

/// Single zone Z = (0..10, 0..10) on floor 7.
pub fn zone_z() -> ZoneRegistry {
    let mut zones = ZoneRegistry::new();
    zones.register("Z", ZoneBounds::new(0, 0, 10, 10), FLOOR);
    zones
}

pub fn is_heal(action: &AgentAction) -> bool {
    matches!(action, AgentAction::UseConsumable(item) if item == "health potion")
}
