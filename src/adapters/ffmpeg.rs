use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::DomainError;
use crate::ports::AudioTranscoder;

/// Transcoder adapter invoking the `ffmpeg` binary once per file.
///
/// The output format is fixed: mono, no video stream, signed 16-bit
/// little-endian PCM, 16 kHz. ffmpeg's own output streams are discarded;
/// the exit code is the only failure signal.
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), DomainError> {
        debug!(input = ?input, output = ?output, "Invoking ffmpeg");

        let status = Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ac", "1", "-vn", "-acodec", "pcm_s16le", "-ar", "16000"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| DomainError::Io(format!("failed to run ffmpeg: {}", e)))?;

        if !status.success() {
            return Err(DomainError::Conversion {
                path: input.display().to_string(),
            });
        }

        Ok(())
    }
}
