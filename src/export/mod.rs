pub mod csv_sink;

use serde::Serialize;

use crate::error::Result;

/// One player's committed rating after a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub round: usize,
    pub player: String,
    pub category: String,
    pub r: f64,
    pub rd: f64,
    pub sigma: f64
}

/// Append-only receiver of per-round snapshots.
pub trait ExportSink {
    fn write_row(&mut self, row: &SnapshotRow) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Keeps every row in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<SnapshotRow>
}

impl ExportSink for MemorySink {
    fn write_row(&mut self, row: &SnapshotRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
