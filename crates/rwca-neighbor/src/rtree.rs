//! R-tree accelerated neighbor search.
//!
//! # Spatial index
//!
//! Three R-trees (via `rstar`) are bulk-loaded from the world at the start of
//! every tick:
//!
//! | Tree        | Entry                | Envelope                     |
//! |-------------|----------------------|------------------------------|
//! | agents      | position             | point                        |
//! | obstacles   | world-space shape    | bounding box of shape points |
//! | wall edges  | segment vertex→next  | bounding box of the segment  |
//!
//! Queries use `locate_within_distance`, whose exact test is each entry's
//! `distance_2`.  Those distances are the same functions
//! [`BruteForceSearch`](crate::BruteForceSearch) uses, so both searches
//! return identical lists.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::trace;

use rwca_core::geom::dist_sq_point_segment;
use rwca_core::{AgentId, ObstacleId, Vec3, WallVertexId};
use rwca_world::{Agent, AgentNeighbor, AgentType, ObstacleNeighbor, WallNeighbor, World};

use crate::search::{NeighborSearch, Neighbors, is_visible_agent, wall_segment};

type Point = [f64; 3];

// ── R-tree entries ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct AgentEntry {
    point: Point,
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<Point>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &Point) -> f64 {
        Vec3::from(*point).distance_squared(Vec3::from(self.point))
    }
}

/// An obstacle's shape already translated into world space.  An obstacle
/// with no shape is indexed by its position alone.
#[derive(Clone, Debug)]
struct ObstacleEntry {
    points: Vec<Vec3>,
    id:     ObstacleId,
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<Point>;
    fn envelope(&self) -> Self::Envelope {
        let lower = self.points.iter().copied().fold(Vec3::INFINITY, Vec3::min);
        let upper = self.points.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
        AABB::from_corners(lower.to_array(), upper.to_array())
    }
}

impl PointDistance for ObstacleEntry {
    fn distance_2(&self, point: &Point) -> f64 {
        let p = Vec3::from(*point);
        self.points
            .iter()
            .map(|&q| p.distance_squared(q))
            .fold(f64::INFINITY, f64::min)
    }
}

/// One wall edge, keyed by the vertex it starts at.
#[derive(Clone, Debug)]
struct EdgeEntry {
    from:   Vec3,
    to:     Vec3,
    vertex: WallVertexId,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<Point>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.from.min(self.to).to_array(), self.from.max(self.to).to_array())
    }
}

impl PointDistance for EdgeEntry {
    fn distance_2(&self, point: &Point) -> f64 {
        dist_sq_point_segment(self.from, self.to, Vec3::from(*point))
    }
}

// ── RTreeSearch ───────────────────────────────────────────────────────────────

/// Neighbor search backed by R-trees rebuilt from the world every tick.
///
/// Rebuilding is an O(n log n) bulk load; each query then only visits
/// entries whose bounding boxes come within `neighbor_dist`.
#[derive(Default)]
pub struct RTreeSearch {
    agents:    RTree<AgentEntry>,
    obstacles: RTree<ObstacleEntry>,
    edges:     RTree<EdgeEntry>,
}

impl RTreeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed `(agents, obstacles, wall edges)`.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.agents.size(), self.obstacles.size(), self.edges.size())
    }
}

impl NeighborSearch for RTreeSearch {
    fn rebuild(&mut self, world: &World) {
        let agents: Vec<AgentEntry> = world
            .agents()
            .iter()
            .filter(|(_, agent)| is_visible_agent(agent))
            .map(|(id, agent)| AgentEntry { point: agent.position.to_array(), id })
            .collect();

        let obstacles: Vec<ObstacleEntry> = world
            .obstacles()
            .iter()
            .map(|(id, obstacle)| {
                let points = if obstacle.shape.is_empty() {
                    vec![obstacle.position]
                } else {
                    obstacle.world_points().collect()
                };
                ObstacleEntry { points, id }
            })
            .collect();

        let edges: Vec<EdgeEntry> = world
            .wall_vertices()
            .iter()
            .filter_map(|(vertex, v)| {
                let (from, to) = wall_segment(world, v)?;
                Some(EdgeEntry { from, to, vertex })
            })
            .collect();

        self.agents = RTree::bulk_load(agents);
        self.obstacles = RTree::bulk_load(obstacles);
        self.edges = RTree::bulk_load(edges);

        let (agents, obstacles, edges) = self.sizes();
        trace!(agents, obstacles, edges, "neighbor index rebuilt");
    }

    fn query(&self, _world: &World, agent: &Agent, profile: &AgentType) -> Neighbors {
        let p = agent.position.to_array();
        let range_sq = profile.neighbor_dist * profile.neighbor_dist;

        let walls = self
            .edges
            .locate_within_distance(p, range_sq)
            .map(|e| WallNeighbor { dist_sq: e.distance_2(&p), vertex: e.vertex })
            .collect();

        let obstacles = self
            .obstacles
            .locate_within_distance(p, range_sq)
            .map(|e| ObstacleNeighbor { dist_sq: e.distance_2(&p), obstacle: e.id })
            .collect();

        let agents = self
            .agents
            .locate_within_distance(p, range_sq)
            .filter(|e| e.id != agent.id)
            .map(|e| AgentNeighbor { dist_sq: e.distance_2(&p), agent: e.id })
            .collect();

        Neighbors { walls, obstacles, agents }.keep_nearest(profile.max_neighbors)
    }
}
