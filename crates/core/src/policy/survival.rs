//! Health and mana threshold monitoring.

use tracing::debug;

use crate::config::{CONSUMABLE_COOLDOWN, SurvivalConfig};
use crate::geometry::Timestamp;
use crate::snapshot::CharacterSnapshot;

/// A vital statistic watched by the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Vital {
    Health,
    Mana,
}

/// A vital dropped below its threshold and its cooldown had elapsed.
///
/// The runtime answers a trigger with either the registered override handler
/// or the configured default remedy, never both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurvivalTrigger {
    pub vital: Vital,
    pub percent: f32,
}

/// Per-vital cooldown bookkeeping.
///
/// Each vital fires at most once per [`CONSUMABLE_COOLDOWN`] window,
/// independently of the other.
#[derive(Clone, Debug, Default)]
pub struct SurvivalMonitor {
    last_heal: Option<Timestamp>,
    last_mana: Option<Timestamp>,
}

impl SurvivalMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_heal(&self) -> Option<Timestamp> {
        self.last_heal
    }

    pub fn last_mana(&self) -> Option<Timestamp> {
        self.last_mana
    }

    /// Evaluate both vitals for this tick.
    ///
    /// Health is always reported before mana. Cooldowns are consumed as soon
    /// as a trigger is produced.
    pub fn evaluate(
        &mut self,
        character: &CharacterSnapshot,
        config: &SurvivalConfig,
        now: Timestamp,
    ) -> Vec<SurvivalTrigger> {
        let mut triggers = Vec::new();

        if let Some(percent) = character.health_percent()
            && let Some(trigger) = Self::check(
                Vital::Health,
                percent,
                config.health_threshold,
                &mut self.last_heal,
                now,
            )
        {
            triggers.push(trigger);
        }

        if let Some(percent) = character.mana_percent()
            && let Some(trigger) = Self::check(
                Vital::Mana,
                percent,
                config.mana_threshold,
                &mut self.last_mana,
                now,
            )
        {
            triggers.push(trigger);
        }

        triggers
    }

    fn check(
        vital: Vital,
        percent: f32,
        threshold: f32,
        last: &mut Option<Timestamp>,
        now: Timestamp,
    ) -> Option<SurvivalTrigger> {
        if percent >= threshold {
            return None;
        }

        if let Some(previous) = *last
            && now.since(previous) < CONSUMABLE_COOLDOWN
        {
            debug!(
                target: "autopilot::survival",
                vital = vital.as_ref(),
                percent,
                "Vital low but still cooling down"
            );
            return None;
        }

        *last = Some(now);
        Some(SurvivalTrigger { vital, percent })
    }
}
