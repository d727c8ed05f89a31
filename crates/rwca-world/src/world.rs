//! The `World` aggregate: clock, agent-type registry, and entity stores.

use rwca_core::{
    AgentId, AgentTypeId, ObstacleId, Vec3, WallId, WallVertexId, WorldClock, WorldError,
    WorldResult,
};
use tracing::{debug, warn};

use crate::agent::{Agent, AgentStatus};
use crate::agent_type::{AgentType, AgentTypeRegistry};
use crate::obstacle::Obstacle;
use crate::store::EntityStore;
use crate::wall::{Wall, WallChain, WallVertex, build_chain};

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Construction parameters for a [`World`].
///
/// Typically loaded from a JSON file by the application and passed to
/// [`World::from_config`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Unix timestamp (nanoseconds) of the initial simulated instant.
    pub start_unix_nanos: i64,

    /// Seconds per step.  `0.1` gives 10 frames per simulated second.
    pub time_step_secs: f64,

    /// Profiles registered after the built-in default, in order.  The first
    /// one gets `AgentTypeId(1)`.
    pub agent_types: Vec<AgentType>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            start_unix_nanos: 0,
            time_step_secs: 0.1,
            agent_types: Vec::new(),
        }
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Authoritative world state for one simulation.
///
/// Owns the clock, the agent-type registry, and one [`EntityStore`] per
/// entity kind (agents, walls, wall vertices, obstacles).  All mutation goes
/// through `&mut self`, so store updates and wall construction are always
/// serialized with respect to readers.
///
/// # Removal policies
///
/// - Agents are soft-deleted: [`remove_agent`](Self::remove_agent) marks them
///   [`AgentStatus::ToBeDeleted`] and the record stays gettable until
///   [`purge_deleted_agents`](Self::purge_deleted_agents).
/// - Walls are hard-deleted together with all of their vertices.
/// - Obstacles are hard-deleted.
///
/// Ids are never reused under either policy.
#[derive(Clone, Debug)]
pub struct World {
    /// Simulated time and fixed step.  Pure storage; the driver advances it.
    pub clock: WorldClock,

    agent_types:   AgentTypeRegistry,
    agents:        EntityStore<AgentId, Agent>,
    walls:         EntityStore<WallId, Wall>,
    wall_vertices: EntityStore<WallVertexId, WallVertex>,
    obstacles:     EntityStore<ObstacleId, Obstacle>,
}

impl World {
    /// An empty world with the default agent type registered as id 0.
    pub fn new(start_unix_nanos: i64, time_step_secs: f64) -> Self {
        Self {
            clock:         WorldClock::new(start_unix_nanos, time_step_secs),
            agent_types:   AgentTypeRegistry::with_default(),
            agents:        EntityStore::new(),
            walls:         EntityStore::new(),
            wall_vertices: EntityStore::new(),
            obstacles:     EntityStore::new(),
        }
    }

    /// Build a world from `config`, registering its extra agent types.
    pub fn from_config(config: &WorldConfig) -> WorldResult<Self> {
        let mut world = Self::new(config.start_unix_nanos, config.time_step_secs);
        for agent_type in &config.agent_types {
            world.add_agent_type(agent_type.clone())?;
        }
        Ok(world)
    }

    // ── Agent types ───────────────────────────────────────────────────────

    /// Register a profile.  Its id is the registry size before insertion;
    /// on a name collision the name now resolves to the new profile.
    pub fn add_agent_type(&mut self, agent_type: AgentType) -> WorldResult<AgentTypeId> {
        let id = self.agent_types.add(agent_type)?;
        debug!(%id, "agent type added");
        Ok(id)
    }

    pub fn agent_type(&self, id: AgentTypeId) -> Option<&AgentType> {
        self.agent_types.get(id)
    }

    pub fn agent_type_by_name(&self, name: &str) -> Option<&AgentType> {
        self.agent_types.get_by_name(name)
    }

    pub fn agent_types(&self) -> &AgentTypeRegistry {
        &self.agent_types
    }

    /// The profile of `agent`.
    pub fn profile_of(&self, agent: &Agent) -> WorldResult<&AgentType> {
        self.agent_types
            .get(agent.agent_type)
            .ok_or(WorldError::AgentTypeNotFound(agent.agent_type))
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Create an agent in status `Created` with zero next velocity.
    ///
    /// # Errors
    ///
    /// [`WorldError::AgentTypeNotFound`] if `agent_type` is not registered;
    /// no id is consumed in that case.
    pub fn add_agent(
        &mut self,
        agent_type:    AgentTypeId,
        position:      Vec3,
        prev_velocity: Vec3,
        pref_velocity: Vec3,
        goal:          Vec3,
    ) -> WorldResult<AgentId> {
        if !self.agent_types.contains(agent_type) {
            warn!(%agent_type, "rejected agent with unregistered type");
            return Err(WorldError::AgentTypeNotFound(agent_type));
        }
        let id = self.agents.insert_with(|id| {
            Agent::new(id, agent_type, position, prev_velocity, pref_velocity, goal)
        })?;
        debug!(%id, %agent_type, "agent added");
        Ok(id)
    }

    pub fn get_agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn get_agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    /// Replace the agent stored at `id`.
    ///
    /// The replacement's `id` field is forced to `id`.  Fails without
    /// mutating anything if `id` is absent or the replacement's type is not
    /// registered.
    pub fn set_agent(&mut self, id: AgentId, mut agent: Agent) -> WorldResult<()> {
        if !self.agents.contains(id) {
            return Err(WorldError::AgentNotFound(id));
        }
        if !self.agent_types.contains(agent.agent_type) {
            return Err(WorldError::AgentTypeNotFound(agent.agent_type));
        }
        agent.id = id;
        self.agents
            .set(id, agent)
            .map(drop)
            .map_err(|_| WorldError::AgentNotFound(id))
    }

    /// Soft delete: mark the agent `ToBeDeleted` and keep its record.
    pub fn remove_agent(&mut self, id: AgentId) -> WorldResult<()> {
        let agent = self.agents.get_mut(id).ok_or(WorldError::AgentNotFound(id))?;
        agent.mark_to_be_deleted();
        debug!(%id, "agent marked for deletion");
        Ok(())
    }

    /// Physically drop every `ToBeDeleted` agent.  Returns how many were
    /// dropped.  Their ids stay retired.
    pub fn purge_deleted_agents(&mut self) -> usize {
        let before = self.agents.len();
        self.agents
            .retain(|_, agent| agent.status != AgentStatus::ToBeDeleted);
        let purged = before - self.agents.len();
        if purged > 0 {
            debug!(purged, "deleted agents purged");
        }
        purged
    }

    pub fn list_agent_ids(&self) -> Vec<AgentId> {
        self.agents.list_ids()
    }

    pub fn agents(&self) -> &EntityStore<AgentId, Agent> {
        &self.agents
    }

    // ── Walls ─────────────────────────────────────────────────────────────

    /// Build a closed wall from `vertices` (≥ 2 points, closing edge
    /// implied) and insert it with its boundary chain.
    ///
    /// Atomic: on error neither the wall nor any vertex is inserted and no
    /// id is consumed.
    ///
    /// # Errors
    ///
    /// [`WorldError::TooFewWallVertices`] for fewer than 2 points.
    pub fn add_wall(&mut self, vertices: &[Vec3]) -> WorldResult<WallId> {
        let wall_id = self.walls.next_id();
        let head = self.wall_vertices.next_id();

        let chain = build_chain(wall_id, head, vertices).inspect_err(|e| {
            warn!(error = %e, "rejected wall");
        })?;
        // `build_chain` validated `n >= 2` and the vertex id range.
        let n = chain.len() as u32;
        self.walls.check_capacity(1)?;
        self.wall_vertices.check_capacity(n)?;

        let head = self.wall_vertices.reserve(n)?;
        for vertex in chain {
            self.wall_vertices.insert_reserved(vertex.id, vertex);
        }
        let wall_id = self.walls.insert_with(|id| Wall {
            id,
            head,
            vertices: vertices.to_vec(),
        })?;

        debug!(%wall_id, %head, vertices = n, "wall added");
        Ok(wall_id)
    }

    pub fn get_wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id)
    }

    pub fn get_wall_vertex(&self, id: WallVertexId) -> Option<&WallVertex> {
        self.wall_vertices.get(id)
    }

    /// Erase the wall and every vertex in `[head, head + len)`.
    ///
    /// Other walls are not relinked; any external handle into the removed
    /// chain now resolves to nothing.
    pub fn remove_wall(&mut self, id: WallId) -> WorldResult<()> {
        let wall = self.walls.remove(id).ok_or(WorldError::WallNotFound(id))?;
        for vertex in wall.vertex_ids() {
            self.wall_vertices.remove(vertex);
        }
        debug!(%id, vertices = wall.len(), "wall removed");
        Ok(())
    }

    /// Iterate the boundary of wall `id` from its head, following `next`.
    pub fn wall_chain(&self, id: WallId) -> WorldResult<WallChain<'_>> {
        let wall = self.walls.get(id).ok_or(WorldError::WallNotFound(id))?;
        Ok(WallChain::new(&self.wall_vertices, wall))
    }

    pub fn list_wall_ids(&self) -> Vec<WallId> {
        self.walls.list_ids()
    }

    pub fn list_wall_vertex_ids(&self) -> Vec<WallVertexId> {
        self.wall_vertices.list_ids()
    }

    pub fn walls(&self) -> &EntityStore<WallId, Wall> {
        &self.walls
    }

    pub fn wall_vertices(&self) -> &EntityStore<WallVertexId, WallVertex> {
        &self.wall_vertices
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    pub fn add_obstacle(
        &mut self,
        position: Vec3,
        shape:    Vec<Vec3>,
        velocity: Vec3,
    ) -> WorldResult<ObstacleId> {
        let id = self
            .obstacles
            .insert_with(|id| Obstacle::new(id, position, shape, velocity))?;
        debug!(%id, "obstacle added");
        Ok(id)
    }

    /// Add a unit cube centred on `position`.
    pub fn add_unit_obstacle(&mut self, position: Vec3, velocity: Vec3) -> WorldResult<ObstacleId> {
        let id = self
            .obstacles
            .insert_with(|id| Obstacle::unit_cube(id, position, velocity))?;
        debug!(%id, "unit obstacle added");
        Ok(id)
    }

    pub fn get_obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    pub fn get_obstacle_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.obstacles.get_mut(id)
    }

    /// Replace the obstacle stored at `id` (its `id` field is forced to
    /// `id`).  Fails without mutation if `id` is absent.
    pub fn set_obstacle(&mut self, id: ObstacleId, mut obstacle: Obstacle) -> WorldResult<()> {
        obstacle.id = id;
        self.obstacles
            .set(id, obstacle)
            .map(drop)
            .map_err(|_| WorldError::ObstacleNotFound(id))
    }

    /// Hard delete.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> WorldResult<()> {
        self.obstacles
            .remove(id)
            .ok_or(WorldError::ObstacleNotFound(id))?;
        debug!(%id, "obstacle removed");
        Ok(())
    }

    pub fn list_obstacle_ids(&self) -> Vec<ObstacleId> {
        self.obstacles.list_ids()
    }

    pub fn obstacles(&self) -> &EntityStore<ObstacleId, Obstacle> {
        &self.obstacles
    }

    // ── Goal tracking ─────────────────────────────────────────────────────

    /// Run the goal predicate for one agent against its type's radius,
    /// transitioning it to `GoalReached` if it arrived.
    pub fn is_reached_goal(&mut self, id: AgentId) -> WorldResult<bool> {
        let agent = self.agents.get_mut(id).ok_or(WorldError::AgentNotFound(id))?;
        let radius = self
            .agent_types
            .get(agent.agent_type)
            .ok_or(WorldError::AgentTypeNotFound(agent.agent_type))?
            .radius;
        Ok(agent.is_reached_goal(radius))
    }

    /// `true` iff every agent has reached its goal (or is marked for
    /// deletion).
    ///
    /// Agents are checked in ascending id order and the scan stops at the
    /// first one still under way, so later agents are not transitioned on
    /// that call.
    pub fn is_finished(&mut self) -> bool {
        for id in self.agents.list_ids() {
            let Some(agent) = self.agents.get_mut(id) else {
                continue;
            };
            let radius = self
                .agent_types
                .get(agent.agent_type)
                .map_or(0.0, |t| t.radius);
            if !agent.is_reached_goal(radius) {
                return false;
            }
        }
        true
    }
}

impl Default for World {
    /// `World::from_config(&WorldConfig::default())`: epoch start, 0.1 s step.
    fn default() -> Self {
        let config = WorldConfig::default();
        Self::new(config.start_unix_nanos, config.time_step_secs)
    }
}
