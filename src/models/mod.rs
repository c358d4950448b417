pub mod archive;
pub mod reading;
pub mod station;
pub mod table;
pub mod wind;

pub use archive::{ArchiveBlock, ArchiveRow};
pub use reading::{Reading, ReadingBuilder, ReadingKey};
pub use station::{Station, StationStatus};
pub use table::ReadingTable;
pub use wind::WindRose;
