//! Authorized play volumes.
//!
//! The agent may only act while the character stands inside a registered
//! zone. Authorization is answered fresh on every query; the registry never
//! caches a previous answer.

use crate::geometry::Position;

/// Identifier assigned by the registry in registration order, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneId(pub u32);

/// Axis-aligned rectangle on the horizontal plane, inclusive on all edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneBounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ZoneBounds {
    /// Corners may be given in any order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }
}

/// A registered play volume. Immutable after registration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub bounds: ZoneBounds,
    pub floor: u8,
}

impl Zone {
    /// Inclusive box containment on x/y and exact floor match on z.
    pub fn contains(&self, position: &Position) -> bool {
        position.z == self.floor && self.bounds.contains(position.x, position.y)
    }
}

/// Ordered collection of zones.
#[derive(Clone, Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new zone and return its id.
    pub fn register(&mut self, name: impl Into<String>, bounds: ZoneBounds, floor: u8) -> ZoneId {
        let id = ZoneId(self.zones.len() as u32 + 1);
        self.zones.push(Zone {
            id,
            name: name.into(),
            bounds,
            floor,
        });
        id
    }

    /// First zone in registration order that contains `position`.
    ///
    /// Overlapping zones are not resolved beyond this first match.
    pub fn is_authorized(&self, position: &Position) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(position))
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> + '_ {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Change in authorization between two observations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoneTransition {
    /// Previously unauthorized, now inside `Zone`.
    Entered(Zone),
    /// Previously inside `Zone`, now unauthorized.
    Left(Zone),
}

/// Remembers the last authorized zone to classify transitions.
#[derive(Clone, Debug, Default)]
pub struct ZoneTracker {
    current: Option<Zone>,
}

impl ZoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Zone> {
        self.current.as_ref()
    }

    /// Record the latest authorization answer and report any transition.
    ///
    /// Moving from one authorized zone straight into another keeps the agent
    /// authorized, so it is recorded without a transition.
    pub fn observe(&mut self, zone: Option<&Zone>) -> Option<ZoneTransition> {
        match (self.current.take(), zone) {
            (None, Some(entered)) => {
                self.current = Some(entered.clone());
                Some(ZoneTransition::Entered(entered.clone()))
            }
            (Some(left), None) => Some(ZoneTransition::Left(left)),
            (Some(_), Some(zone)) => {
                self.current = Some(zone.clone());
                None
            }
            (None, None) => None,
        }
    }

    /// Forget the last zone without reporting a transition.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
