//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `tick_records.csv`
//! - `agent_snapshots.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickRecordRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    records:   Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut records = Writer::from_path(dir.join("tick_records.csv"))?;
        records.write_record(TickRecordRow::HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(AgentSnapshotRow::HEADER)?;

        Ok(Self { records, snapshots, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_tick_record(&mut self, row: &TickRecordRow) -> OutputResult<()> {
        self.records.write_record(&[
            row.tick.to_string(),
            row.susceptible.to_string(),
            row.exposed.to_string(),
            row.infectious.to_string(),
            row.recovered.to_string(),
            row.deceased.to_string(),
            row.total_contamination.to_string(),
            row.contaminated_cells.to_string(),
            row.new_contact_exposures.to_string(),
            row.new_environment_exposures.to_string(),
            row.new_infectious.to_string(),
            row.new_recoveries.to_string(),
            row.new_deaths.to_string(),
            row.clamped_probabilities.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.vx.to_string(),
                row.vy.to_string(),
                row.health.to_owned(),
                row.age_years.to_string(),
                (row.comorbid as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.records.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
