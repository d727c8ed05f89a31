//! World error type.
//!
//! Every expected failure of the world registry is a recoverable value:
//! lookups of absent ids, walls with too few vertices, and exhausted id
//! counters.  Nothing in the registry aborts the process.

use thiserror::Error;

use crate::{AgentId, AgentTypeId, ObstacleId, WallId};

/// The error type shared by the `rwca-*` crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("agent type {0} not found")]
    AgentTypeNotFound(AgentTypeId),

    #[error("no agent type named {0:?}")]
    AgentTypeNameNotFound(String),

    #[error("wall {0} not found")]
    WallNotFound(WallId),

    #[error("obstacle {0} not found")]
    ObstacleNotFound(ObstacleId),

    #[error("a wall needs at least 2 vertices, got {got}")]
    TooFewWallVertices { got: usize },

    #[error("{0} id space exhausted")]
    IdSpaceExhausted(&'static str),
}

/// Shorthand result type for all `rwca-*` crates.
pub type WorldResult<T> = Result<T, WorldError>;
