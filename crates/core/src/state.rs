//! Per-run agent state.

use crate::policy::{EngagementPolicy, ItineraryController, SurvivalMonitor};
use crate::snapshot::EntityId;

/// Mutable state of a running agent.
///
/// Created on start and dropped on stop; nothing here survives a restart.
#[derive(Clone, Debug, Default)]
pub struct AgentState {
    pub survival: SurvivalMonitor,
    pub engagement: EngagementPolicy,
    pub itinerary: ItineraryController,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.engagement.current_target()
    }

    /// Current 1-based waypoint index.
    pub fn waypoint_index(&self) -> usize {
        self.itinerary.index()
    }
}
