//! Floor-plane coordinates.
//!
//! The simulated building is flat: every position lives on the `x`/`z` ground
//! plane and vertical placement is left to the presentation layer.  All
//! proximity rules in the behavior crates are phrased as *squared* distances,
//! so `distance_sq` is the hot-path helper and `distance` exists for movement.

/// A position on the floor plane, in scene units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub z: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Squared straight-line distance.
    #[inline]
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// `true` if `other` lies within `radius_sq` (a squared radius).
    #[inline]
    pub fn within_sq(self, other: Point, radius_sq: f32) -> bool {
        self.distance_sq(other) <= radius_sq
    }

    /// Step at most `max_step` units from `self` toward `target`.
    ///
    /// Returns `target` exactly when it is closer than `max_step`, so repeated
    /// stepping always lands on the target instead of oscillating around it.
    pub fn step_toward(self, target: Point, max_step: f32) -> Point {
        let dist = self.distance(target);
        if dist <= max_step || dist == 0.0 {
            return target;
        }
        let t = max_step / dist;
        Point {
            x: self.x + (target.x - self.x) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    #[inline]
    pub fn as_array(self) -> [f32; 2] {
        [self.x, self.z]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.z)
    }
}
