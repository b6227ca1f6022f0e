use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{stream, StreamExt};
use indicatif::ProgressBar;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::ports::AudioTranscoder;

/// Outcome of one conversion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
}

/// Recursively discover files with extension `ext` under `root`, sorted by
/// path.
///
/// The sort keeps batch totals and progress reporting reproducible. The
/// returned list is fixed: files appearing after dispatch are never picked
/// up by the batch.
pub fn discover(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(ext))
        .collect();
    files.sort();
    files
}

/// Convert every discovered file to the canonical WAV format, with at most
/// `workers` files in flight at once.
///
/// Each unit of work is one file end-to-end, writing a sibling `.wav`; the
/// source is left untouched. A failed file is reported and excluded from
/// the output, but never aborts the batch: the summary always accounts for
/// every file discovered at dispatch time.
pub async fn convert_tree(
    transcoder: Arc<dyn AudioTranscoder>,
    root: &Path,
    ext: &str,
    workers: usize,
) -> BatchSummary {
    let files = discover(root, ext);
    let total = files.len();
    info!(total = total, ext = ext, "Converting files to WAV");

    let progress = ProgressBar::new(total as u64);
    let converted = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    stream::iter(files)
        .for_each_concurrent(workers.max(1), |input| {
            let transcoder = transcoder.clone();
            let converted = converted.clone();
            let failed = failed.clone();
            let progress = progress.clone();
            async move {
                let output = input.with_extension("wav");
                match transcoder.transcode(&input, &output).await {
                    Ok(()) => {
                        converted.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        failed.fetch_add(1, Ordering::SeqCst);
                        warn!(file = ?input, error = %e, "Conversion failed");
                    }
                }
                progress.inc(1);
            }
        })
        .await;

    progress.finish();

    let summary = BatchSummary {
        total,
        converted: converted.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
    };
    info!(
        converted = summary.converted,
        failed = summary.failed,
        total = summary.total,
        "Conversion batch finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use async_trait::async_trait;
    use std::fs;

    /// Test double that "converts" by writing a marker output file, failing
    /// for inputs whose name contains `broken`.
    struct FakeTranscoder;

    #[async_trait]
    impl AudioTranscoder for FakeTranscoder {
        async fn transcode(&self, input: &Path, output: &Path) -> Result<(), DomainError> {
            if input.to_string_lossy().contains("broken") {
                return Err(DomainError::Conversion {
                    path: input.display().to_string(),
                });
            }
            fs::write(output, b"RIFF")?;
            Ok(())
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"aac").unwrap();
    }

    #[test]
    fn test_discovery_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b/second.m4a"));
        touch(&dir.path().join("a/first.m4a"));
        touch(&dir.path().join("a/ignored.txt"));

        let files = discover(dir.path(), "m4a");
        assert_eq!(
            files,
            vec![
                dir.path().join("a/first.m4a"),
                dir.path().join("b/second.m4a"),
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_converts_every_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["x/a.m4a", "x/b.m4a", "y/c.m4a"] {
            touch(&dir.path().join(name));
        }

        let summary = convert_tree(Arc::new(FakeTranscoder), dir.path(), "m4a", 4).await;

        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                converted: 3,
                failed: 0
            }
        );
        // Outputs are siblings; sources survive.
        assert!(dir.path().join("x/a.wav").exists());
        assert!(dir.path().join("x/a.m4a").exists());
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.m4a", "broken.m4a", "c.m4a"] {
            touch(&dir.path().join(name));
        }

        let summary = convert_tree(Arc::new(FakeTranscoder), dir.path(), "m4a", 2).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.converted + summary.failed, summary.total);
        assert!(!dir.path().join("broken.wav").exists());
        assert!(dir.path().join("c.wav").exists());
    }

    #[tokio::test]
    async fn test_empty_tree_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let summary = convert_tree(Arc::new(FakeTranscoder), dir.path(), "m4a", 8).await;
        assert_eq!(summary.total, 0);
    }
}
