//! Fluent builder for constructing a [`Sim`].

use rwca_core::WorldError;
use rwca_neighbor::NeighborSearch;
use rwca_world::World;
use tracing::debug;

use crate::{Sim, SimConfig, SimError, SimResult, VelocitySolver};

/// Fluent builder for [`Sim<N, S>`].
///
/// # Required inputs
///
/// - [`World`] — populated with agent types, agents, walls, and obstacles
/// - `N: NeighborSearch` — e.g. [`rwca_neighbor::RTreeSearch`]
/// - `S: VelocitySolver` — e.g. [`PreferredVelocitySolver`][crate::PreferredVelocitySolver]
///
/// # Optional inputs (have defaults)
///
/// | Method                        | Default                  |
/// |-------------------------------|--------------------------|
/// | `.config(c)`                  | `SimConfig::default()`   |
/// | `.max_ticks(n)`               | `10_000`                 |
/// | `.snapshot_interval_ticks(n)` | `0` (no snapshots)       |
///
/// # Example
///
/// ```rust
/// use rwca_core::Vec3;
/// use rwca_neighbor::BruteForceSearch;
/// use rwca_sim::{NoopObserver, PreferredVelocitySolver, SimBuilder};
/// use rwca_world::World;
///
/// let mut world = World::new(0, 0.1);
/// let walker = world.agent_types().id_of("Default AgentType").unwrap();
/// world
///     .add_agent(walker, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0))
///     .unwrap();
///
/// let mut sim = SimBuilder::new(world, BruteForceSearch, PreferredVelocitySolver)
///     .max_ticks(100)
///     .build()
///     .unwrap();
/// let summary = sim.run_until_finished(&mut NoopObserver).unwrap();
/// assert!(summary.finished);
/// ```
pub struct SimBuilder<N: NeighborSearch, S: VelocitySolver> {
    config: SimConfig,
    world:  World,
    search: N,
    solver: S,
}

impl<N: NeighborSearch, S: VelocitySolver> SimBuilder<N, S> {
    /// Create a builder with all required inputs.
    pub fn new(world: World, search: N, solver: S) -> Self {
        Self {
            config: SimConfig::default(),
            world,
            search,
            solver,
        }
    }

    /// Replace the whole run configuration.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound [`Sim::run_until_finished`]; `0` removes the bound.
    pub fn max_ticks(mut self, n: u64) -> Self {
        self.config.max_ticks = n;
        self
    }

    pub fn snapshot_interval_ticks(mut self, n: u64) -> Self {
        self.config.snapshot_interval_ticks = n;
        self
    }

    /// Validate the world and return a ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidTimeStep`] unless the clock's step is positive
    ///   and finite.
    /// - [`SimError::Config`] if an agent type has a negative or non-finite
    ///   radius, speed, or neighbor distance.
    /// - [`SimError::World`] if an agent refers to an unregistered type.
    pub fn build(self) -> SimResult<Sim<N, S>> {
        let dt = self.world.clock.time_step_secs();
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimeStep(dt));
        }

        for ty in self.world.agent_types().iter() {
            let bounds = [
                ("radius", ty.radius),
                ("max_speed", ty.max_speed),
                ("neighbor_dist", ty.neighbor_dist),
            ];
            if let Some((field, value)) = bounds.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
                return Err(SimError::Config(format!(
                    "agent type {} ({:?}): {field} must be finite and non-negative, got {value}",
                    ty.id, ty.name
                )));
            }
        }

        for (_, agent) in self.world.agents().iter() {
            if self.world.agent_type(agent.agent_type).is_none() {
                return Err(WorldError::AgentTypeNotFound(agent.agent_type).into());
            }
        }

        debug!(
            agents = self.world.agents().len(),
            walls = self.world.walls().len(),
            obstacles = self.world.obstacles().len(),
            max_ticks = self.config.max_ticks,
            "simulation built"
        );

        Ok(Sim {
            config: self.config,
            world:  self.world,
            search: self.search,
            solver: self.solver,
        })
    }
}
