//! Simulation time model.
//!
//! # Design
//!
//! The world clock stores the current instant as Unix nanoseconds plus a
//! fixed time step in seconds (`0.1` for 10 frames per second).  A `Tick`
//! counter records how many steps have been taken since the clock was
//! created.
//!
//! The clock is pure storage: it never advances on its own.  The driver
//! (`rwca-sim`) decides when to take a step and calls
//! [`WorldClock::advance`].

use std::fmt;

const NANOS_PER_SEC: i64 = 1_000_000_000;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── WorldClock ────────────────────────────────────────────────────────────────

/// Current simulated instant, fixed time step, and step counter.
///
/// `WorldClock` is cheap to copy and holds no heap data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldClock {
    /// Unix timestamp (nanoseconds) at which the clock was created.
    pub start_unix_nanos: i64,
    /// Current simulated instant in Unix nanoseconds.
    pub current_unix_nanos: i64,
    /// Seconds of simulated time covered by one step.
    pub time_step_secs: f64,
    /// Steps taken since construction.
    pub current_tick: Tick,
}

impl WorldClock {
    /// Create a clock at `start_unix_nanos` with the given fixed step.
    pub fn new(start_unix_nanos: i64, time_step_secs: f64) -> Self {
        Self {
            start_unix_nanos,
            current_unix_nanos: start_unix_nanos,
            time_step_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Create a clock starting at a whole-second Unix timestamp.
    ///
    /// Saturates like [`set_current_unix_secs`](Self::set_current_unix_secs).
    pub fn from_unix_secs(start_unix_secs: i64, time_step_secs: f64) -> Self {
        Self::new(start_unix_secs.saturating_mul(NANOS_PER_SEC), time_step_secs)
    }

    // ── Current instant ───────────────────────────────────────────────────

    #[inline]
    pub fn current_unix_nanos(&self) -> i64 {
        self.current_unix_nanos
    }

    #[inline]
    pub fn set_current_unix_nanos(&mut self, unix_nanos: i64) {
        self.current_unix_nanos = unix_nanos;
    }

    /// Current instant truncated to whole seconds (floor, also for
    /// pre-epoch instants).
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.current_unix_nanos.div_euclid(NANOS_PER_SEC)
    }

    /// Set the current instant to a whole-second Unix timestamp.
    ///
    /// Instants are stored as `i64` nanoseconds, which covers roughly the
    /// years 1677 to 2262.  Timestamps outside that range saturate to the
    /// nearest representable instant.
    #[inline]
    pub fn set_current_unix_secs(&mut self, unix_secs: i64) {
        self.current_unix_nanos = unix_secs.saturating_mul(NANOS_PER_SEC);
    }

    // ── Time step ─────────────────────────────────────────────────────────

    #[inline]
    pub fn time_step_secs(&self) -> f64 {
        self.time_step_secs
    }

    #[inline]
    pub fn set_time_step_secs(&mut self, time_step_secs: f64) {
        self.time_step_secs = time_step_secs;
    }

    /// The time step rounded to whole nanoseconds.
    #[inline]
    pub fn step_nanos(&self) -> i64 {
        (self.time_step_secs * NANOS_PER_SEC as f64).round() as i64
    }

    /// Advance the clock by one time step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_unix_nanos = self.current_unix_nanos.saturating_add(self.step_nanos());
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated seconds elapsed since the clock's start instant.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        // Widened so instants at opposite ends of the i64 range cannot overflow.
        let nanos = i128::from(self.current_unix_nanos) - i128::from(self.start_unix_nanos);
        nanos as f64 / NANOS_PER_SEC as f64
    }
}

impl fmt::Display for WorldClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{:.3} s)", self.current_tick, self.elapsed_secs())
    }
}
