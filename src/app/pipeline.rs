use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::app::{concat, convert, extract, fetch, segment};
use crate::domain::{manifest, DomainError, PrepConfig};
use crate::ports::{AudioTranscoder, RemoteSource};

/// Path prefixes of the simulated room impulse responses pulled out of the
/// much larger RIR archive.
const RIR_PREFIXES: &[&str] = &[
    "RIRS_NOISES/simulated_rirs/mediumroom",
    "RIRS_NOISES/simulated_rirs/smallroom",
];

/// Source extension of the compressed corpus audio.
const SOURCE_AUDIO_EXT: &str = "m4a";

/// Which pipeline stages to run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stages {
    pub download: bool,
    pub extract: bool,
    pub convert: bool,
    pub augment: bool,
}

/// Sequences the acquisition, extraction, conversion and augmentation
/// stages over injected collaborators.
pub struct Pipeline {
    config: PrepConfig,
    source: Arc<dyn RemoteSource>,
    transcoder: Arc<dyn AudioTranscoder>,
}

impl Pipeline {
    pub fn new(
        config: PrepConfig,
        source: Arc<dyn RemoteSource>,
        transcoder: Arc<dyn AudioTranscoder>,
    ) -> Self {
        Self {
            config,
            source,
            transcoder,
        }
    }

    /// Run the selected stages in their canonical order:
    /// augment, download, extract, convert.
    pub async fn run(&self, stages: Stages) -> Result<(), DomainError> {
        if !self.config.save_path.exists() {
            return Err(DomainError::Config(format!(
                "target directory does not exist: {}",
                self.config.save_path.display()
            )));
        }

        if stages.augment {
            self.run_augment().await?;
        }
        if stages.download {
            self.run_download().await?;
        }
        if stages.extract {
            self.run_extract()?;
        }
        if stages.convert {
            self.run_convert().await;
        }

        Ok(())
    }

    /// Acquire the augmentation corpora: room impulse responses (selective)
    /// and the MUSAN noise corpus (full), then pre-segment MUSAN for fast
    /// random sampling.
    async fn run_augment(&self) -> Result<(), DomainError> {
        info!("Acquiring augmentation data");
        let entries = manifest::read_download_list(&self.list_path("augment.txt"))?;
        fetch::download_all(
            self.source.as_ref(),
            &entries,
            &self.config.credentials,
            &self.config.save_path,
        )
        .await?;

        extract::extract_prefixes(
            &self.config.save_path.join("rirs_noises.zip"),
            RIR_PREFIXES,
            &self.config.save_path,
        )?;
        extract::extract_archive(
            &self.config.save_path.join("musan.tar.gz"),
            &self.config.save_path,
        )?;
        segment::split_noise_corpus(&self.config.save_path)?;
        Ok(())
    }

    async fn run_download(&self) -> Result<(), DomainError> {
        info!("Acquiring corpus archives");
        let entries = manifest::read_download_list(&self.list_path("fileparts.txt"))?;
        fetch::download_all(
            self.source.as_ref(),
            &entries,
            &self.config.credentials,
            &self.config.save_path,
        )
        .await
    }

    /// Reassemble the multi-part archives, extract every combined archive,
    /// and settle the tree into its final layout.
    fn run_extract(&self) -> Result<(), DomainError> {
        info!("Reassembling and extracting archives");
        let entries = manifest::read_part_list(&self.list_path("files.txt"))?;
        let groups = manifest::group_parts(&entries);

        let combined = concat::concatenate_all(&self.config.save_path, &groups)?;
        for archive in &combined {
            extract::extract_archive(archive, &self.config.save_path)?;
        }

        self.finalize_layout()
    }

    async fn run_convert(&self) {
        convert::convert_tree(
            self.transcoder.clone(),
            &self.config.save_path,
            SOURCE_AUDIO_EXT,
            self.config.workers,
        )
        .await;
    }

    fn list_path(&self, name: &str) -> PathBuf {
        self.config.lists_dir.join(name)
    }

    /// Fixed renames the downstream dataset layout expects: the extracted
    /// `dev/aac` tree becomes `aac`, then `wav` becomes `voxceleb1` and
    /// `aac` becomes `voxceleb2`. Not configurable.
    fn finalize_layout(&self) -> Result<(), DomainError> {
        let save = &self.config.save_path;

        let dev_aac = save.join("dev").join("aac");
        if dev_aac.exists() {
            fs::rename(&dev_aac, save.join("aac"))?;
            fs::remove_dir(save.join("dev"))?;
        }
        if save.join("wav").exists() {
            fs::rename(save.join("wav"), save.join("voxceleb1"))?;
        }
        if save.join("aac").exists() {
            fs::rename(save.join("aac"), save.join("voxceleb2"))?;
        }

        info!(save_path = ?save, "Dataset layout finalized");
        Ok(())
    }
}
