use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for whole-file audio transcoding.
///
/// Implementations convert one input file to the canonical PCM format
/// (mono, signed 16-bit little-endian, 16 kHz) at `output`. The input file
/// is never modified or deleted.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Transcode `input` into a canonical-format WAV at `output`.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), DomainError>;
}
