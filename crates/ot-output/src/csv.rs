//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

pub const SNAPSHOT_HEADER: [&str; 10] =
    ["tick", "agent_id", "role", "kind", "state", "hunger", "thirst", "restlessness", "x", "z"];

pub const SUMMARY_HEADER: [&str; 8] = [
    "tick",
    "elapsed_secs",
    "working",
    "in_cafeteria",
    "in_meeting",
    "talking",
    "cafeteria_seats_taken",
    "meetings_running",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self {
            snapshots,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.role.to_owned(),
                row.kind.to_owned(),
                row.state.to_owned(),
                row.hunger.to_string(),
                row.thirst.to_string(),
                format!("{:.2}", row.restlessness),
                format!("{:.3}", row.x),
                format!("{:.3}", row.z),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.1}", row.elapsed_secs),
            row.working.to_string(),
            row.in_cafeteria.to_string(),
            row.in_meeting.to_string(),
            row.talking.to_string(),
            row.cafeteria_seats_taken.to_string(),
            row.meetings_running.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
