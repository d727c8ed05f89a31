//! `rwca-sim` — tick driver for the rwca collision-avoidance world.
//!
//! # Tick
//!
//! ```text
//! each tick:
//!   ① Prefer    — pref_velocity ← toward goal, capped at max_speed
//!                 (agents still Created or Moving only).
//!   ② Neighbors — NeighborSearch rewrites wall / obstacle / agent lists.
//!   ③ Solve     — VelocitySolver picks next_velocity from a read-only world
//!                 (parallel with the `parallel` feature).
//!   ④ Apply     — in ascending AgentId order:
//!                   prev_velocity ← next_velocity
//!                   position     += next_velocity · dt
//!                   Created → Moving, then the goal check
//!                 then obstacles: position += velocity · dt
//!   ⑤ Clock     — world.clock.advance()
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Runs neighbor queries and the solve phase on Rayon's pool.  |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `SimConfig`.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rwca_neighbor::RTreeSearch;
//! use rwca_sim::{NoopObserver, PreferredVelocitySolver, SimBuilder};
//! use rwca_world::World;
//!
//! let world = World::from_config(&world_config)?;
//! let mut sim = SimBuilder::new(world, RTreeSearch::new(), PreferredVelocitySolver)
//!     .config(sim_config)
//!     .build()?;
//! let summary = sim.run_until_finished(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod solver;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RunSummary, Sim};
pub use solver::{PreferredVelocitySolver, VelocitySolver, preferred_velocity};
