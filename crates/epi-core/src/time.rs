//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One tick
//! is one simulated day; every duration in the configuration (incubation,
//! infectious period, contamination decay) is expressed in ticks.
//!
//! Using an integer tick as the canonical time unit means all duration
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).

use std::fmt;

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

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock: the current tick plus a running flag.
///
/// `current_tick` only ever moves forward, one tick per call to
/// [`advance`](Self::advance).  Once [`stop`](Self::stop) has been called the
/// clock refuses to advance, so a finished run cannot be resumed by accident.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current tick — advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
    running: bool,
}

impl SimClock {
    /// A running clock at tick 0.
    pub fn new() -> Self {
        Self {
            current_tick: Tick::ZERO,
            running:      true,
        }
    }

    /// Advance the clock by one tick.  Returns the new tick, or `None` if the
    /// clock has been stopped.
    #[inline]
    pub fn advance(&mut self) -> Option<Tick> {
        if !self.running {
            return None;
        }
        self.current_tick = Tick(self.current_tick.0 + 1);
        Some(self.current_tick)
    }

    #[inline]
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.running { "running" } else { "stopped" };
        write!(f, "{} ({state})", self.current_tick)
    }
}
