//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use epi_agent::Population;
use epi_core::Tick;
use epi_sim::{AgentSnapshot, SimObserver, TickRecord};
use epi_spatial::Environment;

use crate::row::{AgentSnapshotRow, TickRecordRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every tick record and each periodic agent
/// snapshot to an [`OutputWriter`].
///
/// Observer hooks cannot fail, so writer errors are stored.  After
/// `sim.run()` returns, check with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, record: &TickRecord) {
        let result = self.writer.write_tick_record(&TickRecordRow::from(record));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population, _environment: &Environment) {
        let rows: Vec<AgentSnapshotRow> = AgentSnapshot::capture(tick, population)
            .iter()
            .map(AgentSnapshotRow::from)
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
