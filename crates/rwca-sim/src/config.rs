//! Run-level configuration for the tick driver.

/// Limits and output cadence of a simulation run.
///
/// World-level parameters (start time, time step, agent types) live in
/// [`rwca_world::WorldConfig`]; this only governs how long the driver runs
/// and how often observers get snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Upper bound on ticks taken by [`Sim::run_until_finished`].  `0`
    /// means no bound.
    ///
    /// [`Sim::run_until_finished`]: crate::Sim::run_until_finished
    pub max_ticks: u64,

    /// Call `SimObserver::on_snapshot` every this many ticks.  `0` disables
    /// snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks:               10_000,
            snapshot_interval_ticks: 0,
        }
    }
}
