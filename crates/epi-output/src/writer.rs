//! The `OutputWriter` trait.

use crate::{AgentSnapshotRow, OutputResult, TickRecordRow};

/// A sink for tick records and agent snapshots.
///
/// [`SimOutputObserver`][crate::SimOutputObserver] keeps the first error a
/// writer returns; retrieve it with `take_error` after the run.
pub trait OutputWriter {
    /// Write one tick record.
    fn write_tick_record(&mut self, row: &TickRecordRow) -> OutputResult<()>;

    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.  Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
