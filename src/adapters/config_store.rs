use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{DomainError, PrepConfig};
use crate::ports::ConfigStore;

/// TOML-based configuration store at an explicit path.
pub struct TomlConfigStore {
    config_path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<PrepConfig, DomainError> {
        if self.config_path.exists() {
            debug!(path = ?self.config_path, "Loading configuration");
            let content = fs::read_to_string(&self.config_path)?;
            let config: PrepConfig = toml::from_str(&content)?;
            info!(path = ?self.config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?self.config_path, "Configuration file not found, using defaults");
            Ok(PrepConfig::default())
        }
    }

    fn save(&self, config: &PrepConfig) -> Result<(), DomainError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content)?;

        info!(path = ?self.config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.config_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::new(dir.path().join("voxprep.toml"));

        let config = store.load().unwrap();
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::new(dir.path().join("voxprep.toml"));

        let mut config = PrepConfig::new();
        config.workers = 4;
        config.credentials.username = "alice".to_string();
        config.logging.level = "debug".to_string();

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.workers, 4);
        assert_eq!(loaded.credentials.username, "alice");
        assert_eq!(loaded.logging.level, "debug");
    }
}
