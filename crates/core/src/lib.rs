//! Deterministic decision logic for the zone-gated automation agent.
//!
//! `autopilot-core` defines the data model (positions, snapshots, action
//! primitives, configuration), the authorization registry, and the three
//! per-tick policies. Nothing here performs I/O: the host client is reached
//! only through the [`host::WorldView`] and [`host::ActionSink`] traits, and
//! every policy returns a typed decision that the runtime applies.
//!
//! Modules are organized leaves first:
//! - [`geometry`] positions, timestamps and distance helpers
//! - [`snapshot`] immutable per-tick copies of world state
//! - [`action`] action primitives emitted towards the host
//! - [`config`] user-set policy parameters
//! - [`host`] the world interface consumed by the agent
//! - [`zone`] authorized play volumes and transition tracking
//! - [`policy`] survival, engagement and itinerary policies
//! - [`state`] per-run agent state
pub mod action;
pub mod config;
pub mod geometry;
pub mod host;
pub mod policy;
pub mod snapshot;
pub mod state;
pub mod zone;

pub use action::{AgentAction, Remedy, WaypointAction};
pub use config::{
    AgentConfig, CONSUMABLE_COOLDOWN, DEFAULT_TICK_PERIOD, ENGAGEMENT_RADIUS, EngagementConfig,
    EngagementMode, PolicyFlags, SurvivalConfig, Waypoint,
};
pub use geometry::{Position, Timestamp, manhattan_distance, percentage};
pub use host::{ActionError, ActionSink, Host, WorldError, WorldView, dispatch};
pub use policy::{
    EngagementOutcome, EngagementPolicy, ItineraryController, ItineraryStep, SurvivalMonitor,
    SurvivalTrigger, Vital, select_target,
};
pub use snapshot::{CharacterSnapshot, EntityId, EntitySnapshot};
pub use state::AgentState;
pub use zone::{Zone, ZoneBounds, ZoneId, ZoneRegistry, ZoneTracker, ZoneTransition};
