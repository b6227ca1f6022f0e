pub mod config;
pub mod error;
pub mod manifest;

pub use config::{Credentials, LoggingConfig, PrepConfig};
pub use error::DomainError;
pub use manifest::{DownloadEntry, PartEntry, PartGroup};
