//! `rwca-neighbor` — per-tick neighbor search.
//!
//! Before the velocity solver runs, every agent still under way needs to know
//! which wall segments, obstacles, and other agents are close enough to
//! matter.  This crate fills the agent's `wall_neighbors`,
//! `obstacle_neighbors`, and `agent_neighbors` lists.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`search`] | `NeighborSearch` trait, `Neighbors`, `BruteForceSearch`, `populate_neighbors` |
//! | [`rtree`]  | `RTreeSearch` (R-tree indexes rebuilt once per tick)       |
//!
//! # List contract
//!
//! Each list holds only entries within the agent type's `neighbor_dist`, is
//! sorted ascending by squared distance (ties by id), and is truncated to
//! `max_neighbors`.  An agent never lists itself, and agents marked
//! `ToBeDeleted` are invisible to everyone.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Queries run on Rayon's thread pool; results are still applied in ascending agent-id order. |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Neighbors`.       |

pub mod rtree;
pub mod search;


pub use rtree::RTreeSearch;
pub use search::{BruteForceSearch, NeighborSearch, Neighbors, populate_neighbors};
