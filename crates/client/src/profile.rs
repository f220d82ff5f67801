//! Agent profiles loaded from RON files.
//!
//! A profile describes one session: the authorized zones, the agent's
//! survival/engagement/itinerary settings, and the simulated world the agent
//! runs against.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use autopilot_core::{
    AgentConfig, CharacterSnapshot, EngagementConfig, EngagementMode, EntityId, Position,
    SurvivalConfig, Waypoint, ZoneBounds, ZoneRegistry,
};

use crate::sim::{Consumable, SimulatedHost, Spell};

/// Profile compiled into the binary, used when no path is configured.
pub const BUILTIN_PROFILE: &str = include_str!("../profiles/default.ron");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    /// Two opposite corners `(x1, y1, x2, y2)`, in any order.
    pub bounds: (i32, i32, i32, i32),
    pub floor: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementSpec {
    pub mode: EngagementMode,
    pub whitelist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub name: String,
    pub position: Position,
    pub health: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub character: CharacterSpec,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub survival: SurvivalConfig,
    #[serde(default)]
    pub engagement: EngagementSpec,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub creatures: Vec<CreatureSpec>,
    #[serde(default)]
    pub inventory: Vec<(String, Consumable)>,
    #[serde(default)]
    pub spells: Vec<Spell>,
}

impl AgentProfile {
    /// Load a profile from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_ron(&content).with_context(|| format!("Invalid profile {}", path.display()))
    }

    pub fn builtin() -> Result<Self> {
        Self::from_ron(BUILTIN_PROFILE).context("Invalid built-in profile")
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let profile: AgentProfile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile RON: {}", e))?;
        Ok(profile)
    }

    pub fn zone_registry(&self) -> ZoneRegistry {
        let mut zones = ZoneRegistry::new();
        for zone in &self.zones {
            let (x1, y1, x2, y2) = zone.bounds;
            zones.register(zone.name.clone(), ZoneBounds::new(x1, y1, x2, y2), zone.floor);
        }
        zones
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            survival: self.survival.clone(),
            engagement: EngagementConfig::new(
                self.engagement.mode,
                self.engagement.whitelist.iter().cloned(),
            ),
            waypoints: self.waypoints.clone(),
        }
    }

    pub fn simulated_host(&self) -> SimulatedHost {
        let spec = &self.character;
        let mut host = SimulatedHost::new(CharacterSnapshot {
            id: EntityId(1),
            position: spec.position,
            health: spec.health,
            max_health: spec.max_health,
            mana: spec.mana,
            max_mana: spec.max_mana,
        });

        for creature in &self.creatures {
            host = host.with_creature(creature.name.clone(), creature.position, creature.health);
        }
        for (item, consumable) in &self.inventory {
            host = host.with_consumable(item.clone(), consumable.clone());
        }
        for spell in &self.spells {
            host = host.with_spell(spell.clone());
        }
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use autopilot_core::{Remedy, WaypointAction, WorldView};

    const MINIMAL: &str = r#"(
        character: (
            position: (x: 3, y: 3, z: 7),
            health: 80,
            max_health: 100,
            mana: 40,
            max_mana: 60,
        ),
        zones: [(name: "cave", bounds: (10, 10, 0, 0), floor: 7)],
        survival: (
            health_threshold: 60.0,
            health_remedy: Some(Item("health potion")),
        ),
        engagement: (mode: LowestHealth, whitelist: ["Rat", " rat ", "Bat"]),
        waypoints: [
            (position: (x: 1, y: 1, z: 7), action: None),
            (position: (x: 9, y: 9, z: 7), action: Some(Say("hi"))),
        ],
    )"#;

    #[test]
    fn test_builtin_profile_parses() {
        let profile = AgentProfile::builtin().unwrap();
        assert!(!profile.zone_registry().is_empty());
        let host = profile.simulated_host();
        let character = host.current_character();
        assert!(profile.zone_registry().is_authorized(&character.position).is_some());
    }

    #[test]
    fn test_minimal_profile_fills_defaults() {
        let profile = AgentProfile::from_ron(MINIMAL).unwrap();
        let config = profile.agent_config();

        assert_eq!(config.survival.health_threshold, 60.0);
        assert_eq!(config.survival.mana_threshold, 30.0);
        assert_eq!(
            config.survival.health_remedy,
            Some(Remedy::Item("health potion".into()))
        );
        assert_eq!(config.survival.mana_remedy, None);
        assert_eq!(config.engagement.mode, EngagementMode::LowestHealth);
        assert_eq!(config.engagement.whitelist(), ["Rat", "Bat"]);
        assert_eq!(
            config.waypoints[1].action,
            Some(WaypointAction::Say("hi".into()))
        );

        let zones = profile.zone_registry();
        assert!(zones.is_authorized(&Position::new(0, 10, 7)).is_some());
        assert!(profile.creatures.is_empty());
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let profile = AgentProfile::load(file.path()).unwrap();
        let host = profile.simulated_host();
        assert_eq!(
            host.character().unwrap().position,
            Position::new(3, 3, 7)
        );
    }

    #[test]
    fn test_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ron");
        let error = AgentProfile::load(&missing).unwrap_err();
        assert!(error.to_string().contains("Failed to read profile"));

        let broken = dir.path().join("broken.ron");
        std::fs::write(&broken, "(character: ").unwrap();
        let error = AgentProfile::load(&broken).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to parse profile RON"));
    }
}
