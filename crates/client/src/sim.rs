//! In-process world used to exercise the agent without a game client.
//!
//! Action primitives only record intent. The world advances one step each
//! time the agent reads the character snapshot, so effects show up in the
//! next tick's snapshot the way a real client would apply them.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use autopilot_core::{
    ActionError, ActionSink, CharacterSnapshot, ENGAGEMENT_RADIUS, EntityId, EntitySnapshot,
    Position, Vital, WorldError, WorldView, manhattan_distance,
};

/// Damage dealt to the engaged creature per step.
pub const ATTACK_DAMAGE: u32 = 12;
/// Damage an adjacent creature deals to the character per step.
pub const CREATURE_BITE: u32 = 4;

/// A stack of consumables and what each use restores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub restores: Vital,
    pub amount: u32,
    pub stock: u32,
}

/// A spell the character can cast by speaking its words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub words: String,
    pub restores: Vital,
    pub amount: u32,
    pub mana_cost: u32,
}

#[derive(Clone, Debug)]
struct Creature {
    id: EntityId,
    name: String,
    position: Position,
    health: u32,
    max_health: u32,
}

impl Creature {
    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn snapshot(&self) -> EntitySnapshot {
        let percent = self.health as f32 * 100.0 / self.max_health.max(1) as f32;
        EntitySnapshot::new(self.id, self.name.clone(), self.position).with_health(percent)
    }
}

#[derive(Clone, Debug)]
struct World {
    character: CharacterSnapshot,
    creatures: Vec<Creature>,
    destination: Option<Position>,
    engaged: Option<EntityId>,
    steps: u64,
}

impl World {
    fn step(&mut self) {
        self.steps += 1;

        if let Some(destination) = self.destination {
            let position = &mut self.character.position;
            if position.x != destination.x {
                position.x += (destination.x - position.x).signum();
            } else if position.y != destination.y {
                position.y += (destination.y - position.y).signum();
            } else {
                position.z = destination.z;
            }
            if *position == destination {
                self.destination = None;
            }
        }

        let origin = self.character.position;
        if let Some(id) = self.engaged
            && let Some(creature) = self.creatures.iter_mut().find(|c| c.id == id)
        {
            // Engaged creatures close in on the character.
            if manhattan_distance(creature.position, origin) > 1 {
                if creature.position.x != origin.x {
                    creature.position.x += (origin.x - creature.position.x).signum();
                } else {
                    creature.position.y += (origin.y - creature.position.y).signum();
                }
            }

            creature.health = creature.health.saturating_sub(ATTACK_DAMAGE);
            if !creature.is_alive() {
                info!(target: "autopilot::sim", entity = %id, name = %creature.name, "Creature slain");
                self.engaged = None;
            }
        }

        let bites = self
            .creatures
            .iter()
            .filter(|c| c.is_alive() && c.position.same_floor(&origin))
            .filter(|c| manhattan_distance(c.position, origin) <= 1)
            .count() as u32;
        if bites > 0 {
            self.character.health = self.character.health.saturating_sub(bites * CREATURE_BITE);
            debug!(
                target: "autopilot::sim",
                bites,
                health = self.character.health,
                "Character bitten"
            );
        }
    }

    fn restore(&mut self, vital: Vital, amount: u32) {
        let character = &mut self.character;
        match vital {
            Vital::Health => {
                character.health = (character.health + amount).min(character.max_health);
            }
            Vital::Mana => character.mana = (character.mana + amount).min(character.max_mana),
        }
    }
}

/// Host backed by a small simulated world.
pub struct SimulatedHost {
    world: RefCell<World>,
    inventory: HashMap<String, Consumable>,
    spells: Vec<Spell>,
    next_id: u32,
}

impl SimulatedHost {
    pub fn new(character: CharacterSnapshot) -> Self {
        let next_id = character.id.0 + 100;
        Self {
            world: RefCell::new(World {
                character,
                creatures: Vec::new(),
                destination: None,
                engaged: None,
                steps: 0,
            }),
            inventory: HashMap::new(),
            spells: Vec::new(),
            next_id,
        }
    }

    pub fn with_creature(mut self, name: impl Into<String>, position: Position, health: u32) -> Self {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.world.get_mut().creatures.push(Creature {
            id,
            name: name.into(),
            position,
            health,
            max_health: health.max(1),
        });
        self
    }

    pub fn with_consumable(mut self, item: impl Into<String>, consumable: Consumable) -> Self {
        self.inventory.insert(item.into(), consumable);
        self
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.push(spell);
        self
    }

    /// Character as last advanced, without stepping the world.
    pub fn current_character(&self) -> CharacterSnapshot {
        self.world.borrow().character.clone()
    }

    pub fn remaining(&self, item: &str) -> u32 {
        self.inventory.get(item).map_or(0, |c| c.stock)
    }

    pub fn creatures_alive(&self) -> usize {
        self.world
            .borrow()
            .creatures
            .iter()
            .filter(|c| c.is_alive())
            .count()
    }

    pub fn steps(&self) -> u64 {
        self.world.borrow().steps
    }
}

impl WorldView for SimulatedHost {
    fn character(&self) -> Result<CharacterSnapshot, WorldError> {
        let mut world = self
            .world
            .try_borrow_mut()
            .map_err(|_| WorldError::unavailable("world is busy"))?;
        world.step();
        Ok(world.character.clone())
    }

    fn nearby_entities(
        &self,
        position: Position,
        radius: u32,
    ) -> Result<Vec<EntitySnapshot>, WorldError> {
        let world = self
            .world
            .try_borrow()
            .map_err(|_| WorldError::unavailable("world is busy"))?;
        Ok(world
            .creatures
            .iter()
            .filter(|c| manhattan_distance(c.position, position) <= radius)
            .map(Creature::snapshot)
            .collect())
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        let world = self.world.try_borrow().ok()?;
        world
            .creatures
            .iter()
            .find(|c| c.id == id)
            .map(Creature::snapshot)
    }
}

impl ActionSink for SimulatedHost {
    fn use_consumable(&mut self, item: &str) -> Result<(), ActionError> {
        let Some(consumable) = self.inventory.get_mut(item).filter(|c| c.stock > 0) else {
            return Err(ActionError::ConsumableUnavailable { item: item.into() });
        };
        consumable.stock -= 1;
        let (vital, amount) = (consumable.restores, consumable.amount);

        self.world.get_mut().restore(vital, amount);
        debug!(target: "autopilot::sim", item, vital = vital.as_ref(), amount, "Consumable used");
        Ok(())
    }

    fn issue_attack(&mut self, target: EntityId) -> Result<(), ActionError> {
        let world = self.world.get_mut();
        let reachable = world.creatures.iter().any(|c| {
            c.id == target
                && c.is_alive()
                && manhattan_distance(c.position, world.character.position) <= ENGAGEMENT_RADIUS
        });
        if !reachable {
            return Err(ActionError::Rejected {
                action: "attack",
                reason: format!("{target} is not a living creature in range"),
            });
        }
        world.engaged = Some(target);
        Ok(())
    }

    fn issue_move_to(&mut self, destination: Position) -> Result<(), ActionError> {
        self.world.get_mut().destination = Some(destination);
        Ok(())
    }

    fn say_incantation(&mut self, text: &str) -> Result<(), ActionError> {
        let Some(spell) = self
            .spells
            .iter()
            .find(|spell| spell.words.eq_ignore_ascii_case(text))
        else {
            info!(target: "autopilot::sim", text, "Character says");
            return Ok(());
        };

        let world = self.world.get_mut();
        if world.character.mana < spell.mana_cost {
            return Err(ActionError::Rejected {
                action: "say",
                reason: format!("not enough mana for {:?}", spell.words),
            });
        }
        world.character.mana -= spell.mana_cost;
        world.restore(spell.restores, spell.amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> CharacterSnapshot {
        CharacterSnapshot {
            id: EntityId(1),
            position: Position::new(5, 5, 7),
            health: 100,
            max_health: 100,
            mana: 50,
            max_mana: 100,
        }
    }

    #[test]
    fn test_move_steps_one_tile_per_read() {
        let mut host = SimulatedHost::new(hero());
        host.issue_move_to(Position::new(7, 6, 7)).unwrap();

        let positions: Vec<_> = (0..4)
            .map(|_| host.character().unwrap().position)
            .collect();
        assert_eq!(
            positions,
            vec![
                Position::new(6, 5, 7),
                Position::new(7, 5, 7),
                Position::new(7, 6, 7),
                Position::new(7, 6, 7),
            ]
        );
    }

    #[test]
    fn test_consumables_restore_until_stock_runs_out() {
        let mut host = SimulatedHost::new(hero()).with_consumable(
            "mana potion",
            Consumable {
                restores: Vital::Mana,
                amount: 30,
                stock: 1,
            },
        );

        host.use_consumable("mana potion").unwrap();
        assert_eq!(host.current_character().mana, 80);
        assert_eq!(host.remaining("mana potion"), 0);
        assert_eq!(
            host.use_consumable("mana potion"),
            Err(ActionError::ConsumableUnavailable {
                item: "mana potion".into()
            })
        );
    }

    #[test]
    fn test_engaged_creature_closes_in_and_dies() {
        let mut host = SimulatedHost::new(hero()).with_creature("Rat", Position::new(8, 5, 7), 30);
        let rat = host.nearby_entities(Position::new(5, 5, 7), 7).unwrap()[0].id;
        host.issue_attack(rat).unwrap();

        let mut bitten = false;
        for _ in 0..3 {
            bitten |= host.character().unwrap().health < 100;
        }
        assert!(bitten);
        assert_eq!(host.creatures_alive(), 0);
        assert!(host.issue_attack(rat).is_err());
    }

    #[test]
    fn test_spells_cost_mana() {
        let mut host = SimulatedHost::new(hero()).with_spell(Spell {
            words: "exura".into(),
            restores: Vital::Health,
            amount: 20,
            mana_cost: 40,
        });
        host.world.get_mut().character.health = 50;

        host.say_incantation("Exura").unwrap();
        let character = host.current_character();
        assert_eq!((character.health, character.mana), (70, 10));
        assert!(host.say_incantation("exura").is_err());
        host.say_incantation("hello").unwrap();
    }
}
