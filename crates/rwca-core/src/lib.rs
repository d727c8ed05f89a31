//! `rwca-core` — foundational types for the `rwca` collision-avoidance world.
//!
//! This crate is a dependency of every other `rwca-*` crate.  It has no
//! `rwca-*` dependencies and minimal external ones (`glam` and `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`ids`]   | `AgentId`, `WallId`, `WallVertexId`, `ObstacleId`, `AgentTypeId`, `EntityKey` |
//! | [`geom`]  | `Vec3`, `left_of`, `unit_between`, segment distance        |
//! | [`time`]  | `Tick`, `WorldClock`                                       |
//! | [`error`] | `WorldError`, `WorldResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geom;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{WorldError, WorldResult};
pub use geom::{Vec3, left_of, unit_between};
pub use ids::{AgentId, AgentTypeId, EntityKey, ObstacleId, WallId, WallVertexId};
pub use time::{Tick, WorldClock};
