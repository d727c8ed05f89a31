//! Agents, their transient solver inputs, and the goal/status state machine.
//!
//! # Status
//!
//! ```text
//! Created(0) ──mark_moving──▶ Moving(1) ──goal within radius──▶ GoalReached(2)
//!      │                         │                                   │
//!      └──────────── remove ─────┴───────────────────────────────────┴──▶ ToBeDeleted(3)
//! ```
//!
//! `Created` can also jump straight to `GoalReached` when an agent is placed
//! on its goal.  Statuses are totally ordered; everything past `Moving` is
//! finished.

use std::fmt;

use rwca_core::{AgentId, AgentTypeId, ObstacleId, Vec3, WallVertexId};

// ── AgentStatus ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AgentStatus {
    #[default]
    Created = 0,
    Moving = 1,
    GoalReached = 2,
    /// Logically removed.  The record stays in the store.
    ToBeDeleted = 3,
}

impl AgentStatus {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// `true` once the agent no longer needs steering.
    #[inline]
    pub fn is_finished(self) -> bool {
        self > AgentStatus::Moving
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Created     => "created",
            AgentStatus::Moving      => "moving",
            AgentStatus::GoalReached => "goal_reached",
            AgentStatus::ToBeDeleted => "to_be_deleted",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Solver inputs ─────────────────────────────────────────────────────────────

/// A wall segment near an agent.  The segment runs from `vertex` to that
/// vertex's `next`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallNeighbor {
    pub dist_sq: f64,
    pub vertex: WallVertexId,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleNeighbor {
    pub dist_sq: f64,
    pub obstacle: ObstacleId,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentNeighbor {
    pub dist_sq: f64,
    pub agent: AgentId,
}

/// A half-plane constraint in velocity space: the permitted side of the
/// directed line through `point` along `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrcaLine {
    pub point: Vec3,
    pub direction: Vec3,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A moving simulation entity.
///
/// The neighbor lists and `orca_lines` are scratch space rewritten every tick
/// by the neighbor search and the velocity solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,
    pub agent_type: AgentTypeId,
    pub position: Vec3,
    pub prev_velocity: Vec3,
    pub pref_velocity: Vec3,
    pub next_velocity: Vec3,
    pub goal: Vec3,
    pub wall_neighbors: Vec<WallNeighbor>,
    pub obstacle_neighbors: Vec<ObstacleNeighbor>,
    pub agent_neighbors: Vec<AgentNeighbor>,
    pub orca_lines: Vec<OrcaLine>,
    pub status: AgentStatus,
}

impl Agent {
    pub fn new(
        id:            AgentId,
        agent_type:    AgentTypeId,
        position:      Vec3,
        prev_velocity: Vec3,
        pref_velocity: Vec3,
        goal:          Vec3,
    ) -> Self {
        Self {
            id,
            agent_type,
            position,
            prev_velocity,
            pref_velocity,
            next_velocity: Vec3::ZERO,
            goal,
            wall_neighbors: Vec::new(),
            obstacle_neighbors: Vec::new(),
            agent_neighbors: Vec::new(),
            orca_lines: Vec::new(),
            status: AgentStatus::Created,
        }
    }

    /// An agent of the default type (id 0) with every vector at the origin.
    pub fn empty(id: AgentId) -> Self {
        Self::new(id, AgentTypeId(0), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
    }

    /// `Created → Moving`.  No effect in any other state.
    pub fn mark_moving(&mut self) {
        if self.status == AgentStatus::Created {
            self.status = AgentStatus::Moving;
        }
    }

    /// Mark the agent for deletion.  Terminal.
    pub fn mark_to_be_deleted(&mut self) {
        self.status = AgentStatus::ToBeDeleted;
    }

    /// Distance from the current position to the goal.
    #[inline]
    pub fn distance_to_goal(&self) -> f64 {
        self.position.distance(self.goal)
    }

    /// Check whether the agent has reached its goal, transitioning to
    /// `GoalReached` if so.
    ///
    /// Agents already past `Moving` answer `true` without looking at their
    /// position, so the answer never flips back.  Otherwise the goal counts
    /// as reached when `|goal - position| <= radius`.
    pub fn is_reached_goal(&mut self, radius: f64) -> bool {
        if self.status.is_finished() {
            return true;
        }
        if self.distance_to_goal() <= radius {
            self.status = AgentStatus::GoalReached;
            return true;
        }
        false
    }

    /// Drop last tick's neighbor lists and constraints.
    pub fn clear_solver_scratch(&mut self) {
        self.wall_neighbors.clear();
        self.obstacle_neighbors.clear();
        self.agent_neighbors.clear();
        self.orca_lines.clear();
    }
}
