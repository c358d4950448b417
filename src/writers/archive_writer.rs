use crate::error::{ProcessingError, Result};
use crate::models::reading::timestamp_format;
use crate::models::ArchiveBlock;
use crate::utils::constants::{ARCHIVE_FIELDS, COL_STATION, COL_TIMESTAMP, TIMESTAMP_FORMAT};
use crate::utils::filename::monthly_archive_path;
use chrono::{DateTime, FixedOffset};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Appends completed days to `<year>.<month>.csv` files in the wide layout.
///
/// A file starts with two header rows: station names over each column group, then
/// the field names. The station layout is fixed when the file is created; later
/// blocks are fitted to it.
pub struct ArchiveWriter {
    archive_dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    /// Append `block` to its monthly file and return the file path.
    ///
    /// Returns `None` without writing when the file already holds rows at or after
    /// the block's first bucket, i.e. the day was archived before.
    pub fn append(&self, block: &ArchiveBlock) -> Result<Option<PathBuf>> {
        fs::create_dir_all(&self.archive_dir)?;
        let path = monthly_archive_path(&self.archive_dir, &block.day);

        let existing = path.exists() && fs::metadata(&path)?.len() > 0;
        let layout = if existing {
            let layout = self.read_layout(&path)?;
            if let (Some(first), Some(last)) = (block.rows.first(), self.last_timestamp(&path)?) {
                if first.timestamp <= last {
                    warn!(
                        path = %path.display(),
                        day = %block.day.date_naive(),
                        last_archived = %last,
                        "day already archived, skipping"
                    );
                    return Ok(None);
                }
            }
            self.report_layout_drift(&layout, block);
            layout
        } else {
            block.stations.clone()
        };

        let mut records: Vec<Vec<String>> = Vec::with_capacity(block.len() + 2);
        if !existing {
            records.extend(header_rows(&layout));
        }
        for row in &block.rows {
            let mut record = Vec::with_capacity(1 + layout.len() * ARCHIVE_FIELDS.len());
            record.push(row.timestamp.format(TIMESTAMP_FORMAT).to_string());
            for station in &layout {
                record.extend(row.cells_for(station));
            }
            records.push(record);
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in &records {
            writer.write_record(record)?;
        }
        writer.flush()?;

        info!(
            path = %path.display(),
            rows = block.len(),
            created = !existing,
            "archived day"
        );
        Ok(Some(path))
    }

    /// Bucket timestamp of the last data row, `None` for a header-only file
    pub fn last_timestamp(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut last = None;
        for record in reader.records().skip(2) {
            let record = record?;
            if let Some(cell) = record.get(0).filter(|c| !c.trim().is_empty()) {
                last = Some(cell.to_string());
            }
        }

        match last {
            Some(raw) => Ok(Some(timestamp_format::parse(&raw)?)),
            None => Ok(None),
        }
    }

    /// Station column groups declared by an existing archive file
    pub fn read_layout(&self, path: &Path) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = reader.records();
        let stations_row = rows
            .next()
            .transpose()?
            .ok_or_else(|| layout_error(path, "missing station header"))?;
        let fields_row = rows
            .next()
            .transpose()?
            .ok_or_else(|| layout_error(path, "missing field header"))?;

        if stations_row.get(0) != Some(COL_STATION) || fields_row.get(0) != Some(COL_TIMESTAMP) {
            return Err(layout_error(path, "unexpected header labels"));
        }

        let station_cells: Vec<&str> = stations_row.iter().skip(1).collect();
        let field_cells: Vec<&str> = fields_row.iter().skip(1).collect();
        let width = ARCHIVE_FIELDS.len();

        if station_cells.len() != field_cells.len() || station_cells.len() % width != 0 {
            return Err(layout_error(path, "column groups do not line up"));
        }

        let mut stations = Vec::with_capacity(station_cells.len() / width);
        for (group, fields) in station_cells.chunks(width).zip(field_cells.chunks(width)) {
            if group.iter().any(|s| *s != group[0]) || fields != ARCHIVE_FIELDS {
                return Err(layout_error(path, "malformed column group"));
            }
            stations.push(group[0].to_string());
        }

        Ok(stations)
    }

    fn report_layout_drift(&self, layout: &[String], block: &ArchiveBlock) {
        let missing: Vec<&str> = layout
            .iter()
            .filter(|s| !block.stations.contains(s))
            .map(String::as_str)
            .collect();
        let dropped: Vec<&str> = block
            .stations
            .iter()
            .filter(|s| !layout.contains(s))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            warn!(stations = ?missing, "stations absent from this day, padding with blanks");
        }
        if !dropped.is_empty() {
            warn!(stations = ?dropped, "stations not in the monthly header, leaving them out");
        }
    }
}

fn header_rows(stations: &[String]) -> [Vec<String>; 2] {
    let mut station_row = vec![COL_STATION.to_string()];
    let mut field_row = vec![COL_TIMESTAMP.to_string()];

    for station in stations {
        for field in ARCHIVE_FIELDS {
            station_row.push(station.clone());
            field_row.push(field.to_string());
        }
    }

    [station_row, field_row]
}

fn layout_error(path: &Path, message: &str) -> ProcessingError {
    ProcessingError::ArchiveLayout(format!("{}: {}", path.display(), message))
}
