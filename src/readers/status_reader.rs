use crate::error::{ProcessingError, Result};
use crate::models::StationStatus;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct StatusReader;

impl StatusReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the persisted station status. The file must exist.
    pub fn read(&self, path: &Path) -> Result<Vec<StationStatus>> {
        if !path.exists() {
            return Err(ProcessingError::MissingData(format!(
                "status file {}",
                path.display()
            )));
        }

        self.read_from(File::open(path)?)
    }

    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<StationStatus>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        reader
            .deserialize::<StationStatus>()
            .map(|row| row.map_err(ProcessingError::from))
            .collect()
    }
}

impl Default for StatusReader {
    fn default() -> Self {
        Self::new()
    }
}
