use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use voxprep::adapters::{FfmpegTranscoder, ReqwestSource, TomlConfigStore};
use voxprep::app::{Pipeline, Stages};
use voxprep::domain::{DomainError, PrepConfig};
use voxprep::infrastructure::init_logging;
use voxprep::ports::ConfigStore;

/// Speaker-recognition corpus preparation pipeline.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target directory for all downloaded and generated data.
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Directory containing the manifest list files.
    #[arg(long)]
    lists_dir: Option<PathBuf>,

    /// Username for the corpus download server.
    #[arg(long)]
    user: Option<String>,

    /// Password for the corpus download server.
    #[arg(long)]
    password: Option<String>,

    /// Width of the conversion worker pool.
    #[arg(long)]
    workers: Option<usize>,

    /// Optional TOML configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Download the main corpus archives.
    #[arg(long)]
    download: bool,

    /// Reassemble and extract the downloaded archives.
    #[arg(long)]
    extract: bool,

    /// Convert extracted audio to 16 kHz mono WAV.
    #[arg(long)]
    convert: bool,

    /// Download, extract and segment the augmentation corpora.
    #[arg(long)]
    augment: bool,
}

impl Cli {
    fn stages(&self) -> Stages {
        Stages {
            download: self.download,
            extract: self.extract,
            convert: self.convert,
            augment: self.augment,
        }
    }

    /// Resolve the effective configuration: the config file (if any)
    /// overridden by explicit command-line flags.
    fn resolve_config(&self) -> Result<PrepConfig, DomainError> {
        let mut config = match &self.config {
            Some(path) => TomlConfigStore::new(path).load()?,
            None => PrepConfig::default(),
        };

        if let Some(save_path) = &self.save_path {
            config.save_path = save_path.clone();
        }
        if let Some(lists_dir) = &self.lists_dir {
            config.lists_dir = lists_dir.clone();
        }
        if let Some(user) = &self.user {
            config.credentials.username = user.clone();
        }
        if let Some(password) = &self.password {
            config.credentials.password = password.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(
        &config.save_path.join("logs"),
        &config.logging.level,
        config.logging.file_logging,
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match ReqwestSource::new() {
        Ok(source) => Arc::new(source),
        Err(e) => {
            error!(error = %e, "Failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let transcoder = Arc::new(FfmpegTranscoder::new());

    let stages = cli.stages();
    let pipeline = Pipeline::new(config, source, transcoder);

    if let Err(e) = pipeline.run(stages).await {
        error!(error = %e, "Pipeline failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("voxprep.toml");
        std::fs::write(
            &config_path,
            "save_path = \"/corpus\"\nworkers = 2\n\n[credentials]\nusername = \"filed\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "voxprep",
            "--config",
            config_path.to_str().unwrap(),
            "--user",
            "flagged",
            "--workers",
            "6",
            "--convert",
        ]);

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.save_path, PathBuf::from("/corpus"));
        assert_eq!(config.workers, 6);
        assert_eq!(config.credentials.username, "flagged");

        let stages = cli.stages();
        assert!(stages.convert);
        assert!(!stages.download);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = Cli::parse_from(["voxprep", "--download"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.save_path, PathBuf::from("data"));
        assert_eq!(config.workers, 8);
    }
}
