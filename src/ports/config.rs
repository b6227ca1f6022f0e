use std::path::PathBuf;

use crate::domain::{DomainError, PrepConfig};

/// Port for configuration persistence.
pub trait ConfigStore: Send + Sync {
    /// Load the configuration, falling back to defaults if absent.
    fn load(&self) -> Result<PrepConfig, DomainError>;

    /// Persist the configuration.
    fn save(&self, config: &PrepConfig) -> Result<(), DomainError>;

    /// Path of the backing configuration file.
    fn config_path(&self) -> PathBuf;
}
