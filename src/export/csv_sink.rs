use std::{fs::File, io::BufWriter, path::Path};

use csv::{Writer, WriterBuilder};
use tracing::info;

use crate::{
    error::Result,
    export::{ExportSink, SnapshotRow}
};

/// Writes header-less `round,player,category,r,rd,sigma` rows.
pub struct CsvSink {
    writer: Writer<BufWriter<File>>,
    rows: u64
}

impl CsvSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<CsvSink> {
        let file = File::create(path.as_ref())?;
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        info!("Writing rating snapshots to {}", path.as_ref().display());
        Ok(CsvSink { writer, rows: 0 })
    }
}

impl ExportSink for CsvSink {
    fn write_row(&mut self, row: &SnapshotRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        info!("Flushed {} snapshot rows", self.rows);
        Ok(())
    }
}
