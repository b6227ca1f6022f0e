use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Credentials for the corpus download server.
///
/// The password is wiped from memory on drop and never appears in debug
/// output.
#[derive(Clone, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with daily rotation.
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
        }
    }
}

/// Top-level pipeline configuration.
///
/// Passed explicitly into every component; there is no ambient process-wide
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Target directory for all downloaded and generated data.
    pub save_path: PathBuf,
    /// Directory containing the manifest list files.
    pub lists_dir: PathBuf,
    /// Width of the conversion worker pool.
    pub workers: usize,
    pub credentials: Credentials,
    pub logging: LoggingConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("data"),
            lists_dir: PathBuf::from("lists"),
            workers: 8,
            credentials: Credentials::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PrepConfig {
    /// Create a new PrepConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
