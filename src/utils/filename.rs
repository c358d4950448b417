use chrono::{DateTime, Datelike, FixedOffset};
use std::path::{Path, PathBuf};

/// Monthly archive file name with format: {YYYY}.{MM}.csv
pub fn monthly_archive_filename(day: &DateTime<FixedOffset>) -> String {
    format!("{}.{:02}.csv", day.year(), day.month())
}

/// Full path of the monthly archive that receives `day`
pub fn monthly_archive_path(archive_dir: &Path, day: &DateTime<FixedOffset>) -> PathBuf {
    archive_dir.join(monthly_archive_filename(day))
}
