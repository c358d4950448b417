pub mod constants;
pub mod filename;
pub mod numbers;
pub mod progress;
pub mod time;

pub use constants::*;
pub use filename::{monthly_archive_filename, monthly_archive_path};
pub use numbers::{parse_label, parse_localized_number, round_to};
pub use progress::ProgressReporter;
pub use time::{fixed_offset, floor_to, floor_to_midnight, local_to_offset, utc_to_offset};
