//! Simulation observer trait for progress reporting and data collection.

use epi_agent::Population;
use epi_core::Tick;
use epi_spatial::Environment;

use crate::TickRecord;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, record: &TickRecord) {
///         if record.tick.0 % self.interval == 0 {
///             println!("{}: {} infectious", record.tick, record.infectious);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once per tick with that tick's statistics, including the
    /// initial state at tick 0.
    fn on_tick_end(&mut self, _record: &TickRecord) {}

    /// Called every `run.snapshot_interval_ticks` ticks (and at tick 0).
    ///
    /// Provides read-only access to the full agent and environment state so
    /// that output writers can record a snapshot without the sim needing to
    /// know about any specific output format.
    fn on_snapshot(
        &mut self,
        _tick:        Tick,
        _population:  &Population,
        _environment: &Environment,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
