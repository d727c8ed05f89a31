//! `rwca-world` — world-state registry and wall topology.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`store`]      | `EntityStore<I, T>` — id-keyed map with a never-reusing counter |
//! | [`agent_type`] | `AgentType`, `AgentTypeRegistry`                             |
//! | [`agent`]      | `Agent`, `AgentStatus`, neighbor entries, `OrcaLine`         |
//! | [`wall`]       | `Wall`, `WallVertex`, `build_chain`, `WallChain`             |
//! | [`obstacle`]   | `Obstacle`, `UNIT_CUBE`                                      |
//! | [`world`]      | `World`, `WorldConfig`                                       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | Entity maps and the agent-type name index use `FxHashMap`. |
//! | `serde`   | Derives `Serialize`/`Deserialize` on all public types.     |
//!
//! # Quick-start
//!
//! ```rust
//! use rwca_core::Vec3;
//! use rwca_world::{AgentType, World};
//!
//! let mut world = World::new(0, 0.1);
//! let walker = world.add_agent_type(AgentType::named("walker")).unwrap();
//! let agent = world
//!     .add_agent(walker, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0))
//!     .unwrap();
//! let wall = world
//!     .add_wall(&[Vec3::new(2.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)])
//!     .unwrap();
//!
//! assert!(!world.is_reached_goal(agent).unwrap());
//! assert_eq!(world.wall_chain(wall).unwrap().count(), 2);
//! ```

pub mod agent;
pub mod agent_type;
pub mod obstacle;
pub mod store;
pub mod wall;
pub mod world;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentNeighbor, AgentStatus, ObstacleNeighbor, OrcaLine, WallNeighbor};
pub use agent_type::{AgentType, AgentTypeRegistry, DEFAULT_AGENT_TYPE_NAME};
pub use obstacle::{Obstacle, UNIT_CUBE};
pub use store::EntityStore;
pub use wall::{Wall, WallChain, WallVertex, build_chain};
pub use world::{World, WorldConfig};
