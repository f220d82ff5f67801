//! Target selection and engagement.
//!
//! At most one target is active at a time. A target is kept until it
//! disappears from the world or its health reaches zero; only then is a new
//! one searched for.

use tracing::debug;

use crate::config::{ENGAGEMENT_RADIUS, EngagementConfig};
use crate::geometry::{Position, manhattan_distance};
use crate::host::{WorldError, WorldView};
use crate::snapshot::{CharacterSnapshot, EntityId, EntitySnapshot};

/// Result of one engagement tick.
#[derive(Clone, Debug, PartialEq)]
pub enum EngagementOutcome {
    /// The current target is still valid; nothing to do.
    Holding(EntityId),
    /// A new target was selected and should be attacked.
    Acquired(EntitySnapshot),
    /// No target and no eligible candidate in range.
    Idle,
}

#[derive(Clone, Debug, Default)]
pub struct EngagementPolicy {
    current_target: Option<EntityId>,
}

impl EngagementPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_target(&self) -> Option<EntityId> {
        self.current_target
    }

    pub fn clear(&mut self) {
        self.current_target = None;
    }

    pub fn tick<W>(
        &mut self,
        character: &CharacterSnapshot,
        world: &W,
        config: &EngagementConfig,
    ) -> Result<EngagementOutcome, WorldError>
    where
        W: WorldView + ?Sized,
    {
        if let Some(target) = self.current_target {
            match world.entity(target) {
                Some(snapshot) if snapshot.is_alive() => {
                    return Ok(EngagementOutcome::Holding(target));
                }
                _ => {
                    debug!(
                        target: "autopilot::engagement",
                        entity = %target,
                        "Target vanished or died, clearing"
                    );
                    self.current_target = None;
                }
            }
        }

        let candidates = world.nearby_entities(character.position, ENGAGEMENT_RADIUS)?;
        let alive = candidates
            .iter()
            .filter(|entity| entity.id != character.id)
            .filter(|entity| entity.is_alive());

        match select_target(character.position, alive, config) {
            Some(entity) => {
                self.current_target = Some(entity.id);
                Ok(EngagementOutcome::Acquired(entity.clone()))
            }
            None => Ok(EngagementOutcome::Idle),
        }
    }
}

/// Pick the eligible entity with the minimal score for the configured mode.
///
/// Only entities on the same floor within [`ENGAGEMENT_RADIUS`] Manhattan
/// tiles are considered. On an exact score tie the entity that came first in
/// scan order is kept: the running best is replaced only on a strictly lower
/// score.
pub fn select_target<'a, I>(
    origin: Position,
    entities: I,
    config: &EngagementConfig,
) -> Option<&'a EntitySnapshot>
where
    I: IntoIterator<Item = &'a EntitySnapshot>,
{
    let mut best: Option<(&EntitySnapshot, f32)> = None;

    for entity in entities {
        if !entity.position.same_floor(&origin) || !config.is_eligible(entity) {
            continue;
        }

        let distance = manhattan_distance(origin, entity.position);
        if distance > ENGAGEMENT_RADIUS {
            continue;
        }

        let score = config.mode.score(distance, entity.health_percent);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((entity, score)),
        }
    }

    best.map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngagementMode;

    fn at(id: u32, name: &str, x: i32, y: i32) -> EntitySnapshot {
        EntitySnapshot::new(EntityId(id), name, Position::new(x, y, 7))
    }

    const ORIGIN: Position = Position::new(0, 0, 7);

    #[test]
    fn test_closest_picks_minimal_distance() {
        let entities = vec![at(1, "Rat", 3, 3), at(2, "Rat", 1, 1), at(3, "Rat", 0, 4)];
        let config = EngagementConfig::default();

        let chosen = select_target(ORIGIN, &entities, &config).unwrap();
        assert_eq!(chosen.id, EntityId(2));
    }

    #[test]
    fn test_tie_keeps_first_scanned() {
        let entities = vec![at(7, "Rat", 2, 0), at(3, "Rat", 0, 2), at(5, "Rat", 1, 1)];
        let config = EngagementConfig::default();

        for _ in 0..3 {
            let chosen = select_target(ORIGIN, &entities, &config).unwrap();
            assert_eq!(chosen.id, EntityId(7));
        }
    }

    #[test]
    fn test_lowest_health_prefers_wounded() {
        let entities = vec![
            at(1, "Troll", 1, 0).with_health(90.0),
            at(2, "Troll", 5, 0).with_health(20.0),
        ];
        let config = EngagementConfig::new(EngagementMode::LowestHealth, Vec::<String>::new());

        let chosen = select_target(ORIGIN, &entities, &config).unwrap();
        assert_eq!(chosen.id, EntityId(2));
    }

    #[test]
    fn test_highest_health_prefers_healthy() {
        let entities = vec![
            at(1, "Troll", 1, 0).with_health(30.0),
            at(2, "Troll", 5, 0).with_health(100.0),
        ];
        let config = EngagementConfig::new(EngagementMode::HighestHealth, Vec::<String>::new());

        let chosen = select_target(ORIGIN, &entities, &config).unwrap();
        assert_eq!(chosen.id, EntityId(2));
    }

    #[test]
    fn test_out_of_radius_and_other_floor_are_ignored() {
        let mut upstairs = at(1, "Rat", 1, 0);
        upstairs.position.z = 6;
        let entities = vec![upstairs, at(2, "Rat", 4, 4)];
        let config = EngagementConfig::default();

        assert!(select_target(ORIGIN, &entities, &config).is_none());
    }

    #[test]
    fn test_players_and_unlisted_names_are_ineligible() {
        let entities = vec![at(1, "Knight", 1, 0).as_player(), at(2, "Rat", 2, 0)];

        let any = EngagementConfig::default();
        assert_eq!(select_target(ORIGIN, &entities, &any).unwrap().id, EntityId(2));

        let listed = EngagementConfig::new(EngagementMode::Closest, ["dragon"]);
        assert!(select_target(ORIGIN, &entities, &listed).is_none());
    }

    #[test]
    fn test_whitelist_selects_non_ascii_names() {
        let entities = vec![at(1, "ögre", 1, 0)];
        let config = EngagementConfig::new(EngagementMode::Closest, ["ÖGRE"]);

        let chosen = select_target(ORIGIN, &entities, &config).unwrap();
        assert_eq!(chosen.id, EntityId(1));
    }
}
