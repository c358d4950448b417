pub mod error;
pub mod fetchers;
pub mod models;
pub mod processors;
pub mod readers;
pub mod runner;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use settings::Settings;
