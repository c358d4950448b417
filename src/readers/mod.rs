pub mod snapshot_reader;
pub mod status_reader;

pub use snapshot_reader::SnapshotReader;
pub use status_reader::StatusReader;
