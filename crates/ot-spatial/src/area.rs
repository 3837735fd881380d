//! Rectangular destination areas.
//!
//! A break room, an outside lawn, or the cafeteria waiting zone is modelled
//! as an axis-aligned rectangle.  Agents that "wander" pick a fresh point
//! inside it every time they arrive somewhere.

use ot_core::{AgentRng, Point};

use crate::{SpatialError, SpatialResult};

/// Stateless sampler over a `width × length` rectangle centred on `center`.
///
/// `width` spans the `x` axis and `length` the `z` axis.  A zero-sized area
/// always samples its centre, which is how single fixed spots (a snack
/// counter, a drink fountain) are expressed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationArea {
    pub center: Point,
    pub width:  f32,
    pub length: f32,
}

impl DestinationArea {
    pub fn new(center: Point, width: f32, length: f32) -> SpatialResult<Self> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(length) {
            return Err(SpatialError::InvalidArea { width, length });
        }
        Ok(Self { center, width, length })
    }

    /// A zero-sized area at `center`.
    pub fn point(center: Point) -> Self {
        Self { center, width: 0.0, length: 0.0 }
    }

    /// Uniform random point inside the area.
    pub fn sample(&self, rng: &mut AgentRng) -> Point {
        let half_w = self.width * 0.5;
        let half_l = self.length * 0.5;
        Point::new(
            self.center.x + rng.secs_between(-half_w, half_w),
            self.center.z + rng.secs_between(-half_l, half_l),
        )
    }

    /// `true` if `p` lies inside the rectangle (edges included).
    pub fn contains(&self, p: Point) -> bool {
        (p.x - self.center.x).abs() <= self.width * 0.5
            && (p.z - self.center.z).abs() <= self.length * 0.5
    }
}
