//! R-tree proximity index over body positions.
//!
//! Built once per tick from every live body's position and queried for all
//! pairs closer than the contact radius.  This stands in for the trigger
//! volumes of the physical scene: two bodies "collide" when their centres are
//! within `radius` of each other.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ot_core::{AgentId, Point};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct BodyEntry {
    point: [f32; 2], // [x, z]
    id:    AgentId,
}

impl RTreeObject for BodyEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for BodyEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

// ── ContactPair ───────────────────────────────────────────────────────────────

/// An unordered pair of bodies in contact, normalised so `a < b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    pub a: AgentId,
    pub b: AgentId,
}

impl ContactPair {
    pub fn new(x: AgentId, y: AgentId) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    /// The member of the pair that is not `me`.
    pub fn other(&self, me: AgentId) -> AgentId {
        if self.a == me { self.b } else { self.a }
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

/// Spatial index over a snapshot of body positions.
pub struct ProximityIndex {
    tree: RTree<BodyEntry>,
}

impl ProximityIndex {
    /// Bulk-load the index from `(id, position)` pairs.
    pub fn build(bodies: impl IntoIterator<Item = (AgentId, Point)>) -> Self {
        let entries: Vec<BodyEntry> = bodies
            .into_iter()
            .map(|(id, p)| BodyEntry { point: p.as_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Bodies within `radius` of `point`, in ascending id order.
    pub fn within(&self, point: Point, radius: f32) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .tree
            .locate_within_distance(point.as_array(), radius * radius)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every pair of distinct bodies within `radius` of each other, sorted.
    pub fn pairs_within(&self, radius: f32) -> Vec<ContactPair> {
        let r2 = radius * radius;
        let mut pairs: Vec<ContactPair> = Vec::new();
        for entry in self.tree.iter() {
            for other in self.tree.locate_within_distance(entry.point, r2) {
                if other.id > entry.id {
                    pairs.push(ContactPair { a: entry.id, b: other.id });
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}
