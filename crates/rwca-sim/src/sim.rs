//! The `Sim` struct and its tick loop.

use rwca_core::{AgentId, Tick, Vec3};
use rwca_neighbor::{NeighborSearch, populate_neighbors};
use rwca_world::World;
use tracing::{debug, info, trace};

use crate::solver::preferred_velocity;
use crate::{SimConfig, SimObserver, SimResult, VelocitySolver};

/// Outcome of [`Sim::run_until_finished`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks taken by this run.
    pub ticks: u64,
    /// `true` if every agent reached its goal; `false` if `max_ticks` ran out
    /// first.
    pub finished: bool,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<N, S>` owns the world and drives the tick:
///
/// 1. **Prefer**: every agent still under way gets a fresh `pref_velocity`
///    pointing at its goal.
/// 2. **Neighbors**: the [`NeighborSearch`] rewrites each active agent's
///    wall, obstacle, and agent lists.
/// 3. **Solve** (optionally parallel with the `parallel` feature): the
///    [`VelocitySolver`] picks each active agent's next velocity from a
///    read-only view of the world.
/// 4. **Apply** (sequential, ascending `AgentId` for determinism):
///    `next_velocity` and `prev_velocity` take the solution, `position`
///    advances by `velocity * dt`, `Created` agents become `Moving`, and the
///    goal predicate runs.  Obstacles then drift by their own velocity.
/// 5. **Clock**: the world clock advances one step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<N: NeighborSearch, S: VelocitySolver> {
    pub config: SimConfig,

    /// The authoritative world state.  Mutating it between ticks (adding
    /// agents, walls, obstacles) is allowed.
    pub world: World,

    pub search: N,

    pub solver: S,
}

impl<N: NeighborSearch, S: VelocitySolver> Sim<N, S> {
    /// Tick the clock currently points at.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.world.clock.current_tick
    }

    /// Give the world back, e.g. for inspection after a run.
    pub fn into_world(self) -> World {
        self.world
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run exactly `n` ticks from the current position.
    ///
    /// Ignores `max_ticks` and does not stop early when every agent has
    /// arrived.  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        Ok(())
    }

    /// Tick until every agent has reached its goal or `config.max_ticks`
    /// ticks have been taken by this call.
    pub fn run_until_finished<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let start = self.current_tick();
        let limit = self.config.max_ticks;

        let finished = loop {
            if self.world.is_finished() {
                break true;
            }
            if limit > 0 && self.current_tick().since(start) >= limit {
                break false;
            }
            self.observed_step(observer)?;
        };

        let now = self.current_tick();
        let summary = RunSummary { ticks: now.since(start), finished };
        observer.on_sim_end(now);
        if finished {
            info!(ticks = summary.ticks, clock = %self.world.clock, "all agents reached their goals");
        } else {
            info!(ticks = summary.ticks, clock = %self.world.clock, "tick limit reached before all agents arrived");
        }
        Ok(summary)
    }

    /// Process one tick and advance the clock.  Returns the number of agents
    /// moved.
    pub fn step(&mut self) -> SimResult<usize> {
        let moved = self.process_tick()?;
        self.world.clock.advance();
        Ok(moved)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        let now = self.current_tick();
        observer.on_tick_start(now);
        let moved = self.process_tick()?;
        observer.on_tick_end(now, moved);
        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.world);
        }
        self.world.clock.advance();
        Ok(moved)
    }

    fn process_tick(&mut self) -> SimResult<usize> {
        let dt = self.world.clock.time_step_secs();

        // ── Phase 1: preferred velocities ─────────────────────────────────
        let active = self.refresh_preferred(dt)?;
        if active.is_empty() {
            // Nobody is queried, so the populate pass that clears finished
            // agents is skipped.
            for id in self.world.list_agent_ids() {
                if let Some(agent) = self.world.get_agent_mut(id) {
                    agent.clear_solver_scratch();
                }
            }
            self.advance_obstacles(dt);
            trace!(tick = %self.current_tick(), "no active agents");
            return Ok(0);
        }

        // ── Phase 2: neighbor lists ───────────────────────────────────────
        populate_neighbors(&mut self.search, &mut self.world)?;

        // ── Phase 3: solve (produce) ──────────────────────────────────────
        let solutions = self.compute_velocities(&active, dt)?;

        // ── Phase 4: apply (consume) ──────────────────────────────────────
        //
        // `solutions` is in ascending AgentId order, so results do not
        // depend on whether the solve phase ran in parallel.
        let mut arrived = 0;
        for &(id, velocity) in &solutions {
            if self.apply(id, velocity, dt)? {
                arrived += 1;
            }
        }
        self.advance_obstacles(dt);

        trace!(tick = %self.current_tick(), moved = solutions.len(), arrived, "tick processed");
        Ok(solutions.len())
    }

    /// Set `pref_velocity` on every agent still under way and return their
    /// ids in ascending order.
    fn refresh_preferred(&mut self, dt: f64) -> SimResult<Vec<AgentId>> {
        let mut active = Vec::new();
        for id in self.world.list_agent_ids() {
            let Some(agent) = self.world.get_agent(id) else {
                continue;
            };
            if agent.status.is_finished() {
                continue;
            }
            let pref = preferred_velocity(agent, self.world.profile_of(agent)?, dt);
            if let Some(agent) = self.world.get_agent_mut(id) {
                agent.pref_velocity = pref;
            }
            active.push(id);
        }
        Ok(active)
    }

    /// Run the solver for every id in `active`.
    ///
    /// With the `parallel` feature the calls run on Rayon's thread pool.
    fn compute_velocities(&self, active: &[AgentId], dt: f64) -> SimResult<Vec<(AgentId, Vec3)>> {
        let world  = &self.world;
        let solver = &self.solver;

        let solve_one = |id: AgentId| -> SimResult<(AgentId, Vec3)> {
            let agent = world
                .get_agent(id)
                .ok_or(rwca_core::WorldError::AgentNotFound(id))?;
            let profile = world.profile_of(agent)?;
            Ok((id, solver.solve(world, agent, profile, dt)))
        };

        #[cfg(not(feature = "parallel"))]
        {
            active.iter().map(|&id| solve_one(id)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            active.par_iter().map(|&id| solve_one(id)).collect()
        }
    }

    /// Write one agent's solution back and run its goal check.  Returns
    /// `true` if the agent arrived this tick.
    fn apply(&mut self, id: AgentId, velocity: Vec3, dt: f64) -> SimResult<bool> {
        let agent = self
            .world
            .get_agent_mut(id)
            .ok_or(rwca_core::WorldError::AgentNotFound(id))?;
        agent.next_velocity = velocity;
        agent.prev_velocity = velocity;
        agent.position += velocity * dt;
        agent.mark_moving();

        let arrived = self.world.is_reached_goal(id)?;
        if arrived {
            debug!(%id, tick = %self.current_tick(), "agent reached goal");
        }
        Ok(arrived)
    }

    /// Dynamic obstacles drift with constant velocity.
    fn advance_obstacles(&mut self, dt: f64) {
        for id in self.world.list_obstacle_ids() {
            if let Some(obstacle) = self.world.get_obstacle_mut(id) {
                obstacle.position += obstacle.velocity * dt;
            }
        }
    }
}
