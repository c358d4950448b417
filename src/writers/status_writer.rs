use crate::error::Result;
use crate::models::StationStatus;
use crate::utils::constants::{COL_LAST_UPDATE, COL_STATION};
use crate::writers::atomic::write_atomically;
use std::io::Write;
use std::path::Path;

pub struct StatusWriter;

impl StatusWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, path: &Path, status: &[StationStatus]) -> Result<()> {
        write_atomically(path, |out| self.write_to(out, status))
    }

    pub fn write_to<W: Write>(&self, out: W, status: &[StationStatus]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record([COL_STATION, COL_LAST_UPDATE])?;
        for row in status {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for StatusWriter {
    fn default() -> Self {
        Self::new()
    }
}
