use crate::error::Result;
use crate::models::ReadingTable;
use crate::utils::constants::READING_COLUMNS;
use crate::writers::atomic::write_atomically;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub struct SnapshotWriter;

impl SnapshotWriter {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite the daily snapshot in full. The header is written even for an empty table.
    pub fn write(&self, path: &Path, table: &ReadingTable) -> Result<()> {
        write_atomically(path, |out| self.write_to(out, table))?;
        debug!(rows = table.len(), path = %path.display(), "daily snapshot written");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, out: W, table: &ReadingTable) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(READING_COLUMNS)?;
        for reading in table.iter() {
            writer.serialize(reading)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for SnapshotWriter {
    fn default() -> Self {
        Self::new()
    }
}
