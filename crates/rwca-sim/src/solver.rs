//! Velocity solver trait and the goal-seeking default.
//!
//! # Pluggability
//!
//! [`Sim`](crate::Sim) calls the solver through [`VelocitySolver`], so an
//! ORCA-style solver that turns each agent's neighbor lists into
//! `orca_lines` and solves the resulting linear program can be dropped in
//! without touching the driver.  [`PreferredVelocitySolver`] ignores
//! neighbors and simply follows the preferred velocity.

use rwca_core::Vec3;
use rwca_world::{Agent, AgentType, World};

/// Velocity that takes `agent` straight toward its goal at its type's
/// `max_speed`, slowed on the final step so it lands on the goal instead of
/// overshooting.
///
/// Zero when the agent is already on its goal.
pub fn preferred_velocity(agent: &Agent, profile: &AgentType, dt: f64) -> Vec3 {
    let to_goal = agent.goal - agent.position;
    let dist = to_goal.length();
    if dist <= f64::EPSILON {
        return Vec3::ZERO;
    }
    let speed = if dt > 0.0 {
        profile.max_speed.min(dist / dt)
    } else {
        profile.max_speed
    };
    to_goal * (speed / dist)
}

/// Pluggable velocity selection.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; with the `parallel` feature the
/// solve phase runs on Rayon worker threads.
pub trait VelocitySolver: Send + Sync {
    /// Choose `agent`'s next velocity.
    ///
    /// Called once per tick for every agent still under way, after its
    /// `pref_velocity` and neighbor lists have been refreshed.  The world is
    /// read-only; the driver writes the result back.
    fn solve(&self, world: &World, agent: &Agent, profile: &AgentType, dt: f64) -> Vec3;
}

/// Follows `pref_velocity`, clamped to the type's `max_speed`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreferredVelocitySolver;

impl VelocitySolver for PreferredVelocitySolver {
    fn solve(&self, _world: &World, agent: &Agent, profile: &AgentType, _dt: f64) -> Vec3 {
        agent.pref_velocity.clamp_length_max(profile.max_speed)
    }
}
