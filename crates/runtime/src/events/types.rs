//! Typed events emitted by the agent.

use serde::{Deserialize, Serialize};

use autopilot_core::{EntitySnapshot, Position, Waypoint, Zone, ZoneId};

use super::bus::Topic;

/// Why an agent left the `Running` state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Explicit `stop()` from the controlling collaborator.
    Requested,
    /// The character stood outside every authorized zone at the start of a tick.
    ZoneLeft,
    /// The host reported the character's death.
    Died,
    /// The host reported a logout.
    LoggedOut,
}

/// Cancellation reported by the host outside the tick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostSignal {
    Died,
    LoggedOut,
}

impl From<HostSignal> for StopReason {
    fn from(signal: HostSignal) -> Self {
        match signal {
            HostSignal::Died => StopReason::Died,
            HostSignal::LoggedOut => StopReason::LoggedOut,
        }
    }
}

/// Event kinds a collaborator can attach a handler to.
///
/// `HealthLow` and `ManaLow` handlers override the default remedy; the rest
/// are notifications.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum EventKind {
    HealthLow,
    ManaLow,
    TargetAcquired,
    WaypointReached,
    ZoneEntered,
    ZoneLeft,
}

/// Everything the agent reports to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    Started { zone: ZoneId, position: Position },
    Stopped { reason: StopReason },
    ZoneEntered { zone: Zone },
    ZoneLeft { zone: Zone },
    HealthLow { percent: f32 },
    ManaLow { percent: f32 },
    TargetAcquired { target: EntitySnapshot },
    WaypointReached { waypoint: Waypoint, index: usize },
    /// Low severity: the remedy item ran out, no heal was applied this cycle.
    ConsumableUnavailable { item: String },
    /// The world snapshot could not be read; the tick had no side effects.
    TickSkipped { reason: String },
}

impl AgentEvent {
    /// Handler kind for this event, if handlers can be attached to it.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            AgentEvent::HealthLow { .. } => Some(EventKind::HealthLow),
            AgentEvent::ManaLow { .. } => Some(EventKind::ManaLow),
            AgentEvent::TargetAcquired { .. } => Some(EventKind::TargetAcquired),
            AgentEvent::WaypointReached { .. } => Some(EventKind::WaypointReached),
            AgentEvent::ZoneEntered { .. } => Some(EventKind::ZoneEntered),
            AgentEvent::ZoneLeft { .. } => Some(EventKind::ZoneLeft),
            AgentEvent::Started { .. }
            | AgentEvent::Stopped { .. }
            | AgentEvent::ConsumableUnavailable { .. }
            | AgentEvent::TickSkipped { .. } => None,
        }
    }

    pub fn topic(&self) -> Topic {
        match self {
            AgentEvent::Started { .. }
            | AgentEvent::Stopped { .. }
            | AgentEvent::TickSkipped { .. } => Topic::Lifecycle,
            AgentEvent::ZoneEntered { .. } | AgentEvent::ZoneLeft { .. } => Topic::Zone,
            AgentEvent::HealthLow { .. }
            | AgentEvent::ManaLow { .. }
            | AgentEvent::ConsumableUnavailable { .. } => Topic::Survival,
            AgentEvent::TargetAcquired { .. } => Topic::Engagement,
            AgentEvent::WaypointReached { .. } => Topic::Itinerary,
        }
    }
}
