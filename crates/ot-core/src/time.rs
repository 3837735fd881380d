//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One tick
//! is one arrival poll: every worker and manager checks its mover once per
//! tick, and that check is the only point at which an entity resumes after
//! "movement in progress".  The mapping to simulated seconds lives in
//! `SimClock`:
//!
//!   elapsed_secs = tick * tick_duration_ms / 1000
//!
//! Delays in the behavior rules are phrased in seconds (`[10, 30)` s in the
//! break room and so on).  `SimClock::ticks_for_secs` converts them to whole
//! ticks, rounding up so nothing ever fires early.

use std::fmt;

use crate::{OtError, OtResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
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

    /// Ticks elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated milliseconds one tick represents.  Default: 200.
    pub tick_duration_ms: u32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds covered by one tick.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        self.tick_duration_ms as f32 / 1000.0
    }

    /// Elapsed simulated seconds at `tick`.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.tick_duration_ms as f64 / 1000.0
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.secs_at(self.current_tick)
    }

    /// How many ticks span `secs` seconds?  Rounds up and never returns zero,
    /// so a delayed callback always fires on a later tick than the one that
    /// scheduled it.
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        let ms = (secs.max(0.0) * 1000.0).ceil() as u64;
        ms.div_ceil(self.tick_duration_ms.max(1) as u64).max(1)
    }

    /// The tick `secs` seconds after `now`.
    #[inline]
    pub fn after_secs(&self, now: Tick, secs: f32) -> Tick {
        now + self.ticks_for_secs(secs)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Milliseconds per tick (the arrival-poll interval).  Default: 200.
    pub tick_duration_ms: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:      200,
            total_ticks:           9_000, // 30 simulated minutes
            seed:                  42,
            output_interval_ticks: 5,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms)
    }

    /// Reject configurations the tick loop cannot run with.
    pub fn validate(&self) -> OtResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(OtError::Config("tick_duration_ms must be positive".into()));
        }
        Ok(())
    }
}
