//! Spatial and temporal primitives shared by every policy.

use std::time::Duration;

/// Tile position in the world.
///
/// `x`/`y` address the horizontal plane; `z` is the floor level. Distances
/// used by the agent are always measured on the horizontal plane only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns true if both positions are on the same floor.
    pub const fn same_floor(&self, other: &Position) -> bool {
        self.z == other.z
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Calculate Manhattan distance between two positions on the horizontal plane.
///
/// The floor component is ignored; callers compare floors separately.
/// Saturates at `u32::MAX` for positions at opposite ends of the map.
pub fn manhattan_distance(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y))
}

/// Calculate a resource percentage in range [0, 100].
///
/// Returns `None` when `maximum` is zero, meaning the metric is not tracked.
pub fn percentage(current: u32, maximum: u32) -> Option<f32> {
    if maximum == 0 {
        return None;
    }
    Some(current as f32 / maximum as f32 * 100.0)
}

/// Milliseconds on the host's monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, saturating at zero.
    pub const fn since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl From<Duration> for Timestamp {
    fn from(elapsed: Duration) -> Self {
        Self(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: Duration) -> Timestamp {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance_ignores_floor() {
        let a = Position::new(0, 0, 7);
        let b = Position::new(3, 4, 6);
        assert_eq!(manhattan_distance(a, b), 7);

        let c = Position::new(-2, -2, 7);
        let d = Position::new(2, 2, 7);
        assert_eq!(manhattan_distance(c, d), 8);
    }

    #[test]
    fn test_manhattan_distance_saturates_at_map_extremes() {
        let origin = Position::new(5, 5, 7);
        let far = Position::new(i32::MIN, i32::MIN, 7);
        assert_eq!(manhattan_distance(origin, far), u32::MAX);

        let corner = Position::new(i32::MAX, i32::MIN, 7);
        let opposite = Position::new(i32::MIN, i32::MAX, 7);
        assert_eq!(manhattan_distance(corner, opposite), u32::MAX);
        assert_eq!(
            manhattan_distance(Position::new(i32::MIN, 0, 7), Position::new(i32::MAX, 0, 7)),
            u32::MAX
        );
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(50, 100), Some(50.0));
        assert_eq!(percentage(0, 100), Some(0.0));
        assert_eq!(percentage(40, 100), Some(40.0));
        assert_eq!(percentage(10, 0), None);
    }

    #[test]
    fn test_timestamp_since_saturates() {
        let early = Timestamp::from_millis(500);
        let late = Timestamp::from_millis(1600);
        assert_eq!(late.since(early), Duration::from_millis(1100));
        assert_eq!(early.since(late), Duration::ZERO);
        assert_eq!(early + Duration::from_millis(600), Timestamp(1100));
    }
}
