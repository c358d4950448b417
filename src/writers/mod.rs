pub mod archive_writer;
pub mod atomic;
pub mod report_writer;
pub mod snapshot_writer;
pub mod status_writer;

pub use archive_writer::ArchiveWriter;
pub use report_writer::ReportWriter;
pub use snapshot_writer::SnapshotWriter;
pub use status_writer::StatusWriter;
