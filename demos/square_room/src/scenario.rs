//! Scenario file format and world construction.
//!
//! A scenario is one JSON document: the world and sim configuration plus the
//! walls, obstacles, and agents to place.  Agents name their type instead of
//! using a numeric id, so the file stays valid when types are reordered.

use serde::Deserialize;

use rwca_core::{Vec3, WorldError, WorldResult};
use rwca_sim::SimConfig;
use rwca_world::{World, WorldConfig};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub sim: SimConfig,
    /// Closed polygons, counter-clockwise for rooms walked from the inside.
    #[serde(default)]
    pub walls: Vec<Vec<Vec3>>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ObstacleSpec {
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    /// Local-frame points.  A unit cube when absent.
    #[serde(default)]
    pub shape: Option<Vec<Vec3>>,
}

#[derive(Debug, Deserialize)]
pub struct AgentSpec {
    pub agent_type: String,
    pub position: Vec3,
    pub goal: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
}

impl Scenario {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build the world: registry from `world`, then walls, obstacles, and
    /// agents in file order.
    pub fn build_world(&self) -> WorldResult<World> {
        let mut world = World::from_config(&self.world)?;

        for points in &self.walls {
            world.add_wall(points)?;
        }

        for spec in &self.obstacles {
            match &spec.shape {
                Some(shape) => world.add_obstacle(spec.position, shape.clone(), spec.velocity)?,
                None => world.add_unit_obstacle(spec.position, spec.velocity)?,
            };
        }

        for spec in &self.agents {
            let agent_type = world
                .agent_types()
                .id_of(&spec.agent_type)
                .ok_or_else(|| WorldError::AgentTypeNameNotFound(spec.agent_type.clone()))?;
            world.add_agent(agent_type, spec.position, spec.velocity, Vec3::ZERO, spec.goal)?;
        }

        Ok(world)
    }
}
