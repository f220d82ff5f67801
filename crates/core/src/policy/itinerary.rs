//! Cyclic waypoint traversal.

use tracing::debug;

use crate::config::Waypoint;
use crate::geometry::{Position, manhattan_distance};

/// Horizontal distance at which a waypoint counts as reached.
pub const ARRIVAL_DISTANCE: u32 = 1;

/// Result of one itinerary tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItineraryStep {
    /// No waypoints configured.
    Empty,
    /// Not there yet; travel towards the current waypoint.
    MoveTo(Position),
    /// The waypoint at 1-based `index` was reached; the cursor already advanced.
    Arrived { waypoint: Waypoint, index: usize },
}

/// Cursor over the waypoint list.
///
/// The index is 1-based and always lies in `[1, N]` once the list is
/// non-empty; after the last waypoint it wraps back to 1.
#[derive(Clone, Debug)]
pub struct ItineraryController {
    index: usize,
}

impl Default for ItineraryController {
    fn default() -> Self {
        Self { index: 1 }
    }
}

impl ItineraryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current 1-based waypoint index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 1;
    }

    pub fn tick(&mut self, waypoints: &[Waypoint], position: &Position) -> ItineraryStep {
        if waypoints.is_empty() {
            return ItineraryStep::Empty;
        }

        // The list may have shrunk between runs of the cursor.
        if self.index > waypoints.len() {
            self.index = 1;
        }

        let index = self.index;
        let Some(current) = waypoints.get(index - 1) else {
            return ItineraryStep::Empty;
        };

        let distance = manhattan_distance(*position, current.position);
        if distance <= ARRIVAL_DISTANCE && position.same_floor(&current.position) {
            self.index = if index >= waypoints.len() { 1 } else { index + 1 };
            debug!(
                target: "autopilot::itinerary",
                index,
                next = self.index,
                "Waypoint reached"
            );
            return ItineraryStep::Arrived {
                waypoint: current.clone(),
                index,
            };
        }

        ItineraryStep::MoveTo(current.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::WaypointAction;

    fn route() -> Vec<Waypoint> {
        vec![
            Waypoint::new(Position::new(0, 0, 7)),
            Waypoint::new(Position::new(10, 0, 7)),
            Waypoint::new(Position::new(10, 10, 7)).with_action(WaypointAction::Say("hi".into())),
        ]
    }

    #[test]
    fn test_empty_list_is_noop() {
        let mut itinerary = ItineraryController::new();
        assert_eq!(
            itinerary.tick(&[], &Position::new(0, 0, 7)),
            ItineraryStep::Empty
        );
        assert_eq!(itinerary.index(), 1);
    }

    #[test]
    fn test_moves_towards_current_waypoint() {
        let mut itinerary = ItineraryController::new();
        let waypoints = route();
        assert_eq!(
            itinerary.tick(&waypoints, &Position::new(5, 5, 7)),
            ItineraryStep::MoveTo(Position::new(0, 0, 7))
        );
        assert_eq!(itinerary.index(), 1);
    }

    #[test]
    fn test_wrong_floor_is_not_arrival() {
        let mut itinerary = ItineraryController::new();
        let waypoints = route();
        assert_eq!(
            itinerary.tick(&waypoints, &Position::new(0, 0, 8)),
            ItineraryStep::MoveTo(Position::new(0, 0, 7))
        );
    }

    #[test]
    fn test_far_waypoint_is_not_arrival() {
        let mut itinerary = ItineraryController::new();
        let far = Position::new(i32::MIN, i32::MIN, 7);
        let waypoints = vec![Waypoint::new(far)];
        assert_eq!(
            itinerary.tick(&waypoints, &Position::new(0, 0, 7)),
            ItineraryStep::MoveTo(far)
        );
        assert_eq!(itinerary.index(), 1);
    }

    #[test]
    fn test_wraps_after_last_waypoint() {
        let mut itinerary = ItineraryController::new();
        let waypoints = route();

        for (expected, waypoint) in waypoints.iter().enumerate() {
            let mut near = waypoint.position;
            near.x += 1;
            match itinerary.tick(&waypoints, &near) {
                ItineraryStep::Arrived { index, .. } => assert_eq!(index, expected + 1),
                step => panic!("expected arrival, got {step:?}"),
            }
            assert!((1..=waypoints.len()).contains(&itinerary.index()));
        }

        assert_eq!(itinerary.index(), 1);
        assert_eq!(
            itinerary.tick(&waypoints, &Position::new(10, 10, 7)),
            ItineraryStep::MoveTo(Position::new(0, 0, 7))
        );
    }

    #[test]
    fn test_index_clamps_when_list_shrinks() {
        let mut itinerary = ItineraryController::new();
        let waypoints = route();
        itinerary.tick(&waypoints, &Position::new(0, 0, 7));
        itinerary.tick(&waypoints, &Position::new(10, 0, 7));
        assert_eq!(itinerary.index(), 3);

        let shorter = &waypoints[..1];
        assert_eq!(
            itinerary.tick(shorter, &Position::new(0, 1, 7)),
            ItineraryStep::Arrived {
                waypoint: waypoints[0].clone(),
                index: 1
            }
        );
        assert_eq!(itinerary.index(), 1);
    }
}
