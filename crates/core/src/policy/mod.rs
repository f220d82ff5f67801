//! Per-tick decision policies.
//!
//! Each policy owns its slice of [`crate::AgentState`] and returns a typed
//! decision instead of acting on the host directly. The runtime applies the
//! decisions in a fixed order: survival, engagement, itinerary.

mod engagement;
mod itinerary;
mod survival;

pub use engagement::{EngagementOutcome, EngagementPolicy, select_target};
pub use itinerary::{ARRIVAL_DISTANCE, ItineraryController, ItineraryStep};
pub use survival::{SurvivalMonitor, SurvivalTrigger, Vital};
