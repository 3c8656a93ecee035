//! Neighbour queries: "which agents are within distance r of this point?"
//!
//! The engine rebuilds the index once per phase from a position snapshot and
//! then issues one `within` query per agent.  Results are always returned in
//! ascending `AgentId` order so downstream iteration (and therefore RNG draw
//! order) does not depend on the index's internal layout.
//!
//! Two implementations are provided:
//!
//! - [`GridIndex`] — uniform bucket grid in an `FxHashMap`.  Best when the
//!   query radius is roughly constant and close to the bucket size.
//! - [`RTreeIndex`] — `rstar` R-tree rebuilt by bulk load.  Insensitive to
//!   radius and density.
//!
//! [`brute_force_within`] is the O(n) reference both are tested against.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use epi_core::{AgentId, Vec2};

use crate::{SpatialError, SpatialResult};

/// Spatial index over agent positions.
///
/// Implementations must be `Send + Sync` so the per-agent query phase can
/// run under rayon.
pub trait NeighborIndex: Send + Sync {
    /// Replace the indexed set with `points`.
    fn rebuild(&mut self, points: &[(AgentId, Vec2)]);

    /// Clear `out` and fill it with every indexed agent whose distance to
    /// `center` is `<= radius`, in ascending id order.  The querying agent
    /// is included if it is indexed; callers filter it.
    fn within(&self, center: Vec2, radius: f64, out: &mut Vec<AgentId>);
}

/// O(n) scan.  The reference answer for the indexed variants.
pub fn brute_force_within(points: &[(AgentId, Vec2)], center: Vec2, radius: f64) -> Vec<AgentId> {
    let r2 = radius * radius;
    let mut out: Vec<AgentId> = points
        .iter()
        .filter(|(_, p)| p.distance_sq(center) <= r2)
        .map(|&(id, _)| id)
        .collect();
    out.sort_unstable();
    out
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

type Bucket = (i64, i64);

/// Uniform-grid hash index.
pub struct GridIndex {
    bucket_size: f64,
    buckets:     FxHashMap<Bucket, Vec<(AgentId, Vec2)>>,
}

impl GridIndex {
    pub fn new(bucket_size: f64) -> SpatialResult<Self> {
        if !(bucket_size.is_finite() && bucket_size > 0.0) {
            return Err(SpatialError::InvalidArgument { what: "bucket size", value: bucket_size });
        }
        Ok(Self { bucket_size, buckets: FxHashMap::default() })
    }

    #[inline]
    fn bucket_of(&self, p: Vec2) -> Bucket {
        (
            (p.x / self.bucket_size).floor() as i64,
            (p.y / self.bucket_size).floor() as i64,
        )
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl NeighborIndex for GridIndex {
    fn rebuild(&mut self, points: &[(AgentId, Vec2)]) {
        self.buckets.clear();
        for &(id, p) in points {
            let key = self.bucket_of(p);
            self.buckets.entry(key).or_default().push((id, p));
        }
    }

    fn within(&self, center: Vec2, radius: f64, out: &mut Vec<AgentId>) {
        out.clear();
        if radius < 0.0 || radius.is_nan() {
            return;
        }
        let r2 = radius * radius;
        let (lo_x, lo_y) = self.bucket_of(Vec2::new(center.x - radius, center.y - radius));
        let (hi_x, hi_y) = self.bucket_of(Vec2::new(center.x + radius, center.y + radius));
        for bx in lo_x..=hi_x {
            for by in lo_y..=hi_y {
                let Some(bucket) = self.buckets.get(&(bx, by)) else { continue };
                out.extend(
                    bucket
                        .iter()
                        .filter(|(_, p)| p.distance_sq(center) <= r2)
                        .map(|&(id, _)| id),
                );
            }
        }
        out.sort_unstable();
    }
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: an `[x, y]` point with its agent.
#[derive(Clone)]
struct AgentEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree index, bulk-loaded on every rebuild.
#[derive(Default)]
pub struct RTreeIndex {
    tree: RTree<AgentEntry>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl NeighborIndex for RTreeIndex {
    fn rebuild(&mut self, points: &[(AgentId, Vec2)]) {
        let entries = points
            .iter()
            .map(|&(id, p)| AgentEntry { point: [p.x, p.y], id })
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    fn within(&self, center: Vec2, radius: f64, out: &mut Vec<AgentId>) {
        out.clear();
        if radius < 0.0 || radius.is_nan() {
            return;
        }
        out.extend(
            self.tree
                .locate_within_distance([center.x, center.y], radius * radius)
                .map(|e| e.id),
        );
        out.sort_unstable();
    }
}
