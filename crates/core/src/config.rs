//! User-set policy parameters.
//!
//! [`AgentConfig`] is owned by the calling UI/CLI collaborator. It is mutated
//! between runs or through the explicit `configure_*` calls on the runtime
//! context; policies only ever read it.

use std::time::Duration;

use bitflags::bitflags;

use crate::action::{Remedy, WaypointAction};
use crate::geometry::Position;
use crate::snapshot::EntitySnapshot;

/// Default scheduler period between two ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Rolling window during which a consumable category fires at most once.
pub const CONSUMABLE_COOLDOWN: Duration = Duration::from_secs(1);

/// Scan radius (Manhattan tiles) used when looking for a new target.
pub const ENGAGEMENT_RADIUS: u32 = 7;

bitflags! {
    /// Which policies run on each tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PolicyFlags: u8 {
        const SURVIVAL   = 1 << 0;
        const ENGAGEMENT = 1 << 1;
        const ITINERARY  = 1 << 2;
    }
}

impl Default for PolicyFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Health/mana thresholds and the remedies used when they are crossed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurvivalConfig {
    /// Heal when health percentage drops strictly below this value.
    pub health_threshold: f32,
    /// Restore mana when mana percentage drops strictly below this value.
    pub mana_threshold: f32,
    pub health_remedy: Option<Remedy>,
    pub mana_remedy: Option<Remedy>,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            health_threshold: 50.0,
            mana_threshold: 30.0,
            health_remedy: None,
            mana_remedy: None,
        }
    }
}

impl SurvivalConfig {
    pub fn new(health_threshold: f32, mana_threshold: f32) -> Self {
        Self {
            health_threshold,
            mana_threshold,
            ..Self::default()
        }
    }

    pub fn with_health_remedy(mut self, remedy: Remedy) -> Self {
        self.health_remedy = Some(remedy);
        self
    }

    pub fn with_mana_remedy(mut self, remedy: Remedy) -> Self {
        self.mana_remedy = Some(remedy);
        self
    }
}

/// How the engagement policy ranks eligible targets. Lower score wins.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EngagementMode {
    /// Score = distance.
    #[default]
    Closest,
    /// Score = health% + 0.1 × distance.
    LowestHealth,
    /// Score = (100 − health%) + 0.1 × distance.
    HighestHealth,
}

impl EngagementMode {
    /// Priority score of a candidate; lower is better.
    pub fn score(self, distance: u32, health_percent: f32) -> f32 {
        let distance = distance as f32;
        match self {
            EngagementMode::Closest => distance,
            EngagementMode::LowestHealth => health_percent + 0.1 * distance,
            EngagementMode::HighestHealth => (100.0 - health_percent) + 0.1 * distance,
        }
    }
}

/// Target selection parameters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngagementConfig {
    pub mode: EngagementMode,
    /// Creature names to engage. Empty means "any non-player".
    whitelist: Vec<String>,
}

impl EngagementConfig {
    pub fn new<I, S>(mode: EngagementMode, whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in whitelist {
            let name = name.into();
            let name = name.trim();
            if name.is_empty() || names.iter().any(|n| same_name(n, name)) {
                continue;
            }
            names.push(name.to_owned());
        }
        Self {
            mode,
            whitelist: names,
        }
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    /// Returns true if the entity may be selected as a target.
    ///
    /// With an empty whitelist any non-player qualifies; otherwise only a
    /// case-insensitive name match does.
    pub fn is_eligible(&self, entity: &EntitySnapshot) -> bool {
        if self.whitelist.is_empty() {
            return !entity.is_player;
        }
        self.whitelist
            .iter()
            .any(|name| same_name(name, &entity.name))
    }
}

/// Unicode case-insensitive name comparison.
fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// A stop on the itinerary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action: Option<WaypointAction>,
}

impl Waypoint {
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            action: None,
        }
    }

    pub fn with_action(mut self, action: WaypointAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Complete policy configuration for one agent.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub survival: SurvivalConfig,
    pub engagement: EngagementConfig,
    pub waypoints: Vec<Waypoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::snapshot::EntityId;
    use std::str::FromStr;

    fn creature(name: &str) -> EntitySnapshot {
        EntitySnapshot::new(EntityId(1), name, Position::new(0, 0, 7))
    }

    #[test]
    fn test_empty_whitelist_accepts_any_non_player() {
        let config = EngagementConfig::default();
        assert!(config.is_eligible(&creature("Rat")));
        assert!(!config.is_eligible(&creature("Knight").as_player()));
    }

    #[test]
    fn test_whitelist_matches_case_insensitively() {
        let config = EngagementConfig::new(EngagementMode::Closest, ["Cave Rat", "troll"]);
        assert!(config.is_eligible(&creature("cave rat")));
        assert!(config.is_eligible(&creature("TROLL")));
        assert!(!config.is_eligible(&creature("Rat")));
    }

    #[test]
    fn test_whitelist_folds_non_ascii_case() {
        let config = EngagementConfig::new(EngagementMode::Closest, ["ÖGRE", "Élan"]);
        assert!(config.is_eligible(&creature("ögre")));
        assert!(config.is_eligible(&creature("ÉLAN")));
        assert!(!config.is_eligible(&creature("ogre")));
    }

    #[test]
    fn test_whitelist_deduplicates_names() {
        let config = EngagementConfig::new(EngagementMode::Closest, ["Rat", "rat", " ", "RAT"]);
        assert_eq!(config.whitelist(), &["Rat".to_string()]);

        let config = EngagementConfig::new(EngagementMode::Closest, ["Ögre", "öGRE"]);
        assert_eq!(config.whitelist(), &["Ögre".to_string()]);
    }

    #[test]
    fn test_mode_scores() {
        assert_eq!(EngagementMode::Closest.score(4, 80.0), 4.0);
        assert!((EngagementMode::LowestHealth.score(4, 80.0) - 80.4).abs() < 1e-4);
        assert!((EngagementMode::HighestHealth.score(4, 80.0) - 20.4).abs() < 1e-4);
    }

    #[test]
    fn test_mode_parses_from_text() {
        assert_eq!(
            EngagementMode::from_str("lowest_health").ok(),
            Some(EngagementMode::LowestHealth)
        );
        assert_eq!(
            EngagementMode::from_str("CLOSEST").ok(),
            Some(EngagementMode::Closest)
        );
        assert_eq!(EngagementMode::HighestHealth.to_string(), "highest_health");
    }

    #[test]
    fn test_policy_flags_default_to_all() {
        let flags = PolicyFlags::default();
        assert!(flags.contains(PolicyFlags::SURVIVAL | PolicyFlags::ENGAGEMENT));
        assert!(flags.contains(PolicyFlags::ITINERARY));
    }
}
