pub mod daily_merger;
pub mod resampler;
pub mod status_tracker;

pub use daily_merger::{DailyMerger, MergeOutcome, MergePlan};
pub use resampler::Resampler;
pub use status_tracker::StatusTracker;
