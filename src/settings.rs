use crate::error::Result;
use crate::fetchers::RetryPolicy;
use crate::utils::constants::{
    ARCHIVE_DIR, DEFAULT_BASE_URL, DEFAULT_DIRECTORY_TIMEOUT_FACTOR, DEFAULT_RETRY_MAX,
    DEFAULT_SLEEP_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_UTC_OFFSET_HOURS, REPORT_FILE,
    SETTINGS_ENV_PREFIX, SETTINGS_FILE, SNAPSHOT_FILE, STATUS_FILE,
};
use crate::utils::time::fixed_offset;
use chrono::FixedOffset;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Runtime settings.
///
/// Loaded from built-in defaults, then an optional `meteo.toml` in the working
/// directory, then `METEO_*` environment variables.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(url)]
    pub base_url: String,

    /// Retries after the first failed attempt on a station page
    pub retry_max: u32,

    /// Backoff unit between retries, also the pause between stations
    pub sleep_secs: u64,

    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    /// The directory page is slow, it gets this many times the normal timeout
    #[validate(range(min = 1))]
    pub directory_timeout_factor: u32,

    #[validate(range(min = -12, max = 14))]
    pub utc_offset_hours: i32,

    pub snapshot_file: PathBuf,
    pub status_file: PathBuf,
    pub report_file: PathBuf,
    pub archive_dir: PathBuf,
    pub show_progress: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Config::builder().add_source(File::with_name(SETTINGS_FILE).required(false)))
    }

    /// Layer defaults under `builder`, then the environment over it
    fn load_from(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = Self::with_defaults(builder)?
            .add_source(Environment::with_prefix(SETTINGS_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
        Ok(builder
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("retry_max", i64::from(DEFAULT_RETRY_MAX))?
            .set_default("sleep_secs", DEFAULT_SLEEP_SECS as i64)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default(
                "directory_timeout_factor",
                i64::from(DEFAULT_DIRECTORY_TIMEOUT_FACTOR),
            )?
            .set_default("utc_offset_hours", i64::from(DEFAULT_UTC_OFFSET_HOURS))?
            .set_default("snapshot_file", SNAPSHOT_FILE)?
            .set_default("status_file", STATUS_FILE)?
            .set_default("report_file", REPORT_FILE)?
            .set_default("archive_dir", ARCHIVE_DIR)?
            .set_default("show_progress", true)?)
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        fixed_offset(self.utc_offset_hours)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_max, self.pause())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn directory_timeout(&self) -> Duration {
        self.timeout() * self.directory_timeout_factor
    }

    /// Pause between consecutive station requests
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.sleep_secs)
    }
}
