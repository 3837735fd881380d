//! Per-body movement state.

use ot_core::Point;

/// Kinematic state of one body.
///
/// A body is either **moving** toward `destination` or **stopped**.  A stopped
/// body may still be away from its destination if it was teleported by
/// [`MobilityStore::place`][crate::MobilityStore::place]; it then reports no
/// arrival until a new destination is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    pub position:    Point,
    pub destination: Point,
    /// Walking speed in units per second.
    pub speed:       f32,
    pub moving:      bool,
    /// Despawned bodies are skipped by `advance` and by proximity checks.
    pub active:      bool,
}

impl MovementState {
    /// A stopped body standing on `at`.
    pub fn stationary(at: Point, speed: f32) -> Self {
        Self {
            position:    at,
            destination: at,
            speed,
            moving:      false,
            active:      true,
        }
    }

    /// Squared distance still to walk.
    #[inline]
    pub fn remaining_sq(&self) -> f32 {
        self.position.distance_sq(self.destination)
    }
}
