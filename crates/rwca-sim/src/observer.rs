//! Simulation observer trait for progress reporting and data collection.

use rwca_core::Tick;
use rwca_world::World;

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// struct Arrivals { last: usize }
///
/// impl SimObserver for Arrivals {
///     fn on_snapshot(&mut self, _tick: Tick, world: &World) {
///         self.last = world
///             .agents()
///             .iter()
///             .filter(|(_, a)| a.status.is_finished())
///             .count();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, before the clock advances.
    ///
    /// `moved` is the number of agents that were solved and moved this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called every `config.snapshot_interval_ticks` ticks with read-only
    /// access to the whole world.
    fn on_snapshot(&mut self, _tick: Tick, _world: &World) {}

    /// Called once when a run stops.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
