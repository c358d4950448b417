use crate::error::{ProcessingError, Result};
use crate::models::{Reading, ReadingTable};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct SnapshotReader;

impl SnapshotReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the daily snapshot. A missing file is a precondition failure.
    pub fn read(&self, path: &Path) -> Result<ReadingTable> {
        if !path.exists() {
            return Err(ProcessingError::SnapshotMissing {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        self.read_from(file)
    }

    /// Read snapshot rows from any CSV source
    pub fn read_from<R: Read>(&self, source: R) -> Result<ReadingTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut table = ReadingTable::new();
        for record in reader.deserialize::<Reading>() {
            table.insert(record?);
        }

        Ok(table)
    }
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "fecha,estacion,viento_direccion,viento_velocidad,temperatura,temperatura_de_rocio,humedad_relativa,presion_atmosferica,precipitacion";

    #[test]
    fn test_read_snapshot_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(
            temp_file,
            "2021-03-14 10:00:00-04:00,El Alto,NNE,5.0,8.5,1.2,45.0,650.3,0.0"
        )?;
        writeln!(temp_file, "2021-03-14 10:00:00-04:00,Oruro,,,,,,,")?;

        let table = SnapshotReader::new().read(temp_file.path())?;
        let rows = table.into_readings();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].station, "El Alto");
        assert_eq!(rows[0].wind_direction.as_deref(), Some("NNE"));
        assert_eq!(rows[0].pressure, Some(650.3));
        assert_eq!(rows[1].wind_direction, None);
        assert!(rows[1].numeric_values().iter().all(Option::is_none));

        Ok(())
    }

    #[test]
    fn test_duplicate_rows_keep_last() -> Result<()> {
        let data = format!(
            "{}\n2021-03-14 10:00:00-04:00,A,,1.0,,,,,\n2021-03-14 10:00:00-04:00,A,,2.0,,,,,\n",
            HEADER
        );

        let table = SnapshotReader::new().read_from(data.as_bytes())?;

        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().wind_speed, Some(2.0));
        Ok(())
    }

    #[test]
    fn test_header_only_is_empty() -> Result<()> {
        let table = SnapshotReader::new().read_from(format!("{}\n", HEADER).as_bytes())?;
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = SnapshotReader::new().read(Path::new("/nonexistent/hoy.csv"));
        assert!(matches!(result, Err(ProcessingError::SnapshotMissing { .. })));
    }

    #[test]
    fn test_malformed_timestamp_is_fatal() {
        let data = format!("{}\nyesterday,A,,,,,,,\n", HEADER);
        assert!(SnapshotReader::new().read_from(data.as_bytes()).is_err());
    }
}
