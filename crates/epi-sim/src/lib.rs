//! `epi-sim` — tick loop orchestrator for the `epi` outbreak simulator.
//!
//! # Tick loop
//!
//! ```text
//! step():
//!   ① Advance   — clock.tick += 1.
//!   ② Move      — BehaviorPolicy::plan_move for every alive agent against the
//!                 pre-move snapshot (parallel with `parallel`), then
//!                 Population::apply_moves.
//!   ③ Transmit  — TransmissionModel::plan for every agent against the
//!                 post-move snapshot, then commit in AgentId order.
//!   ④ Shed      — Infectious agents deposit, cleaners clean.
//!   ⑤ Decay     — Environment::decay(decay_factor).
//!   ⑥ Check     — state counts, positions, speeds, field non-negative.
//!   ⑦ Record    — StatisticsRecorder::sample → TickRecord.
//!   ⑧ Stop?     — no Exposed/Infectious agents (after the configured lag),
//!                 or tick == max_ticks.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs phases ② and ③ planning on Rayon's thread pool.   |
//! | `serde`    | Derives `Serialize`/`Deserialize` on output records.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_core::EpiConfig;
//! use epi_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::standard(EpiConfig::default())?.build()?;
//! let series = sim.run(&mut NoopObserver)?;
//! println!("peak infectious: {:?}", series.peak_infectious());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod recorder;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use recorder::{StatisticsRecorder, TickRecord, TimeSeries};
pub use sim::Sim;
pub use snapshot::AgentSnapshot;
