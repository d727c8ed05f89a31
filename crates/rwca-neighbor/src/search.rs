//! The neighbor-search trait, the reference brute-force implementation, and
//! the per-tick populate pass.
//!
//! # Pluggability
//!
//! `rwca-sim` drives neighbor search through the [`NeighborSearch`] trait, so
//! the O(n²) [`BruteForceSearch`] and the indexed
//! [`RTreeSearch`](crate::RTreeSearch) are interchangeable.  Both rank
//! candidates with the distance functions in this module, so for the same
//! world they produce identical lists.

use rwca_core::geom::dist_sq_point_segment;
use rwca_core::{AgentId, Vec3, WorldError, WorldResult};
use rwca_world::{
    Agent, AgentNeighbor, AgentStatus, AgentType, Obstacle, ObstacleNeighbor, WallNeighbor,
    WallVertex, World,
};
use tracing::trace;

// ── Neighbors ─────────────────────────────────────────────────────────────────

/// The three neighbor lists of one agent for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbors {
    pub walls:     Vec<WallNeighbor>,
    pub obstacles: Vec<ObstacleNeighbor>,
    pub agents:    Vec<AgentNeighbor>,
}

impl Neighbors {
    /// Sort every list ascending by `(dist_sq, id)` and cut it to `max`.
    pub fn keep_nearest(mut self, max: usize) -> Self {
        keep_nearest(&mut self.walls, max);
        keep_nearest(&mut self.obstacles, max);
        keep_nearest(&mut self.agents, max);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.obstacles.is_empty() && self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.walls.len() + self.obstacles.len() + self.agents.len()
    }
}

trait Ranked {
    fn dist_sq(&self) -> f64;
    fn raw_id(&self) -> u32;
}

impl Ranked for WallNeighbor {
    fn dist_sq(&self) -> f64 {
        self.dist_sq
    }

    fn raw_id(&self) -> u32 {
        self.vertex.0
    }
}

impl Ranked for ObstacleNeighbor {
    fn dist_sq(&self) -> f64 {
        self.dist_sq
    }

    fn raw_id(&self) -> u32 {
        self.obstacle.0
    }
}

impl Ranked for AgentNeighbor {
    fn dist_sq(&self) -> f64 {
        self.dist_sq
    }

    fn raw_id(&self) -> u32 {
        self.agent.0
    }
}

fn keep_nearest<T: Ranked>(list: &mut Vec<T>, max: usize) {
    list.sort_unstable_by(|a, b| {
        a.dist_sq()
            .total_cmp(&b.dist_sq())
            .then(a.raw_id().cmp(&b.raw_id()))
    });
    list.truncate(max);
}

// ── Distance functions ────────────────────────────────────────────────────────

/// Squared distance from `p` to the nearest point of `obstacle`'s shape in
/// world space, or to its `position` when the shape is empty.
pub fn obstacle_dist_sq(obstacle: &Obstacle, p: Vec3) -> f64 {
    if obstacle.shape.is_empty() {
        return p.distance_squared(obstacle.position);
    }
    obstacle
        .world_points()
        .map(|q| p.distance_squared(q))
        .fold(f64::INFINITY, f64::min)
}

/// The segment from `vertex` to its `next` vertex, if that vertex exists.
pub fn wall_segment(world: &World, vertex: &WallVertex) -> Option<(Vec3, Vec3)> {
    world
        .get_wall_vertex(vertex.next)
        .map(|next| (vertex.point, next.point))
}

/// Whether `other` may appear in `agent`'s agent list.
#[inline]
pub(crate) fn is_visible_agent(other: &Agent) -> bool {
    other.status != AgentStatus::ToBeDeleted
}

// ── NeighborSearch trait ──────────────────────────────────────────────────────

/// Pluggable neighbor search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so queries can run on Rayon worker
/// threads with the `parallel` feature.
pub trait NeighborSearch: Send + Sync {
    /// Refresh any acceleration structure from the world's current state.
    ///
    /// Called once per tick before any [`query`](Self::query).
    fn rebuild(&mut self, _world: &World) {}

    /// Compute `agent`'s neighbor lists under `profile`'s bounds.
    ///
    /// Implementations must honor the list contract documented at the crate
    /// root.  [`Neighbors::keep_nearest`] does the sorting and truncation.
    fn query(&self, world: &World, agent: &Agent, profile: &AgentType) -> Neighbors;
}

// ── BruteForceSearch ──────────────────────────────────────────────────────────

/// Scans every wall vertex, obstacle, and agent for each query.
///
/// O(n) per query and O(n²) per tick.  The reference the indexed search is
/// tested against.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForceSearch;

impl NeighborSearch for BruteForceSearch {
    fn query(&self, world: &World, agent: &Agent, profile: &AgentType) -> Neighbors {
        let p = agent.position;
        let range_sq = profile.neighbor_dist * profile.neighbor_dist;

        let walls = world
            .wall_vertices()
            .iter()
            .filter_map(|(id, vertex)| {
                let (a, b) = wall_segment(world, vertex)?;
                let dist_sq = dist_sq_point_segment(a, b, p);
                (dist_sq <= range_sq).then_some(WallNeighbor { dist_sq, vertex: id })
            })
            .collect();

        let obstacles = world
            .obstacles()
            .iter()
            .filter_map(|(id, obstacle)| {
                let dist_sq = obstacle_dist_sq(obstacle, p);
                (dist_sq <= range_sq).then_some(ObstacleNeighbor { dist_sq, obstacle: id })
            })
            .collect();

        let agents = world
            .agents()
            .iter()
            .filter(|&(id, other)| id != agent.id && is_visible_agent(other))
            .filter_map(|(id, other)| {
                let dist_sq = p.distance_squared(other.position);
                (dist_sq <= range_sq).then_some(AgentNeighbor { dist_sq, agent: id })
            })
            .collect();

        Neighbors { walls, obstacles, agents }.keep_nearest(profile.max_neighbors)
    }
}

// ── Populate pass ─────────────────────────────────────────────────────────────

/// Rebuild `search` and rewrite the neighbor lists of every agent in `world`.
///
/// Agents still under way (`Created` or `Moving`) get fresh lists.  Finished
/// agents have all of their solver scratch cleared.  Queries only read the
/// world (in parallel with the `parallel` feature); results are written back
/// sequentially in ascending agent-id order.
///
/// Returns the number of agents that were queried.
///
/// # Errors
///
/// [`WorldError::AgentTypeNotFound`] if an active agent's type is missing;
/// no agent is modified in that case.
pub fn populate_neighbors<S>(search: &mut S, world: &mut World) -> WorldResult<usize>
where
    S: NeighborSearch + ?Sized,
{
    search.rebuild(world);

    let active: Vec<AgentId> = world
        .agents()
        .iter()
        .filter(|(_, agent)| !agent.status.is_finished())
        .map(|(id, _)| id)
        .collect();

    let found = compute(&*search, world, &active)?;

    for id in world.list_agent_ids() {
        if let Some(agent) = world.get_agent_mut(id) {
            agent.clear_solver_scratch();
        }
    }
    for (id, neighbors) in found {
        let agent = world.get_agent_mut(id).ok_or(WorldError::AgentNotFound(id))?;
        agent.wall_neighbors = neighbors.walls;
        agent.obstacle_neighbors = neighbors.obstacles;
        agent.agent_neighbors = neighbors.agents;
    }

    trace!(agents = active.len(), "neighbor lists populated");
    Ok(active.len())
}

fn query_one<S>(search: &S, world: &World, id: AgentId) -> WorldResult<(AgentId, Neighbors)>
where
    S: NeighborSearch + ?Sized,
{
    let agent = world.get_agent(id).ok_or(WorldError::AgentNotFound(id))?;
    let profile = world.profile_of(agent)?;
    Ok((id, search.query(world, agent, profile)))
}

#[cfg(not(feature = "parallel"))]
fn compute<S>(search: &S, world: &World, active: &[AgentId]) -> WorldResult<Vec<(AgentId, Neighbors)>>
where
    S: NeighborSearch + ?Sized,
{
    active
        .iter()
        .map(|&id| query_one(search, world, id))
        .collect()
}

#[cfg(feature = "parallel")]
fn compute<S>(search: &S, world: &World, active: &[AgentId]) -> WorldResult<Vec<(AgentId, Neighbors)>>
where
    S: NeighborSearch + ?Sized,
{
    use rayon::prelude::*;

    // Indexed collect keeps the ascending-id order of `active`.
    active
        .par_iter()
        .map(|&id| query_one(search, world, id))
        .collect()
}
