//! Simulation time model.
//!
//! # Design
//!
//! The driver advances an integer `Tick` counter; simulated seconds are
//!
//!   time = tick * dt_secs
//!
//! Events are authored in seconds.  [`SimClock::tick_for_time`] maps an event
//! time to the first tick whose time reaches it (within [`TIME_EPS`]), so an
//! event that lands exactly on a step fires there and one that falls between
//! two steps fires on the later of them instead of being skipped.

use std::fmt;

/// Tolerance when comparing an event time against the step time.
pub const TIME_EPS: f64 = 1e-7;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds per tick (the operational model's time step).
    pub dt_secs: f64,
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f64) -> Self {
        Self { dt_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Simulated seconds at `tick`.
    #[inline]
    pub fn time_of(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.dt_secs
    }

    /// Simulated seconds at the current tick.
    #[inline]
    pub fn now(&self) -> f64 {
        self.time_of(self.current_tick)
    }

    /// First tick whose time is `>= time - TIME_EPS`.  Negative times map to
    /// tick 0.
    pub fn tick_for_time(&self, time: f64) -> Tick {
        if self.dt_secs <= 0.0 || time <= TIME_EPS {
            return Tick::ZERO;
        }
        let steps = ((time - TIME_EPS) / self.dt_secs).ceil();
        let mut tick = Tick(steps.max(0.0) as u64);
        // `ceil` can overshoot by one when `time` is an exact multiple that
        // rounds up in floating point.
        if tick.0 > 0 && self.time_of(Tick(tick.0 - 1)) >= time - TIME_EPS {
            tick = Tick(tick.0 - 1);
        }
        tick
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.now())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation driver.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick.  Default: 0.01.
    pub dt_secs: f64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { dt_secs: 0.01, total_ticks: 0, seed: 0, num_threads: None }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }
}
