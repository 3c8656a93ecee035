//! `epi-output` — CSV writers for epidemic simulation output.
//!
//! | File                  | Contents                                         |
//! |-----------------------|--------------------------------------------------|
//! | `tick_records.csv`    | One row per tick: state counts, field, flows     |
//! | `agent_snapshots.csv` | One row per agent every `snapshot_interval_ticks` |
//!
//! [`CsvWriter`] implements [`OutputWriter`] and is driven by
//! [`SimOutputObserver`], which implements `epi_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use epi_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickRecordRow};
pub use writer::OutputWriter;
