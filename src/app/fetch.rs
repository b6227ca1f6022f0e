use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::app::checksum;
use crate::domain::{Credentials, DomainError, DownloadEntry};
use crate::ports::RemoteSource;

/// Destination file name for a URL: its last path segment.
fn file_name_from_url(url: &str) -> Result<String, DomainError> {
    let parsed =
        Url::parse(url).map_err(|e| DomainError::Manifest(format!("invalid URL {}: {}", url, e)))?;
    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DomainError::Manifest(format!("URL has no file name: {}", url)))
}

/// Download every manifest entry into `dest_dir`, strictly in file order.
///
/// Downloads run sequentially so a failure surfaces as one clear message.
/// A transport failure aborts the stage immediately; a checksum mismatch is
/// reported loudly and the stage moves on.
pub async fn download_all(
    source: &dyn RemoteSource,
    entries: &[DownloadEntry],
    credentials: &Credentials,
    dest_dir: &Path,
) -> Result<(), DomainError> {
    for entry in entries {
        let name = file_name_from_url(&entry.url)?;
        let dest = dest_dir.join(&name);

        info!(url = %entry.url, dest = ?dest, "Downloading");
        source.download(&entry.url, credentials, &dest).await?;

        let actual = checksum::md5_hex(&dest)?;
        if actual.eq_ignore_ascii_case(&entry.md5) {
            info!(file = %name, "Checksum successful");
        } else {
            warn!(file = %name, expected = %entry.md5, actual = %actual, "Checksum failed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;

    /// Test double that writes fixed bytes to the destination.
    struct FakeSource {
        body: Vec<u8>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteSource for FakeSource {
        async fn download(
            &self,
            url: &str,
            _credentials: &Credentials,
            dest: &Path,
        ) -> Result<(), DomainError> {
            self.requests.lock().unwrap().push(url.to_string());
            fs::write(dest, &self.body)?;
            Ok(())
        }
    }

    /// Test double that always fails with a transport error.
    struct BrokenSource;

    #[async_trait]
    impl RemoteSource for BrokenSource {
        async fn download(
            &self,
            url: &str,
            _credentials: &Credentials,
            _dest: &Path,
        ) -> Result<(), DomainError> {
            Err(DomainError::Download {
                url: url.to_string(),
            })
        }
    }

    fn entry(url: &str, md5: &str) -> DownloadEntry {
        DownloadEntry {
            url: url.to_string(),
            md5: md5.to_string(),
        }
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("http://example.com/corpus/a.zip").unwrap(),
            "a.zip"
        );
        assert!(file_name_from_url("http://example.com/").is_err());
        assert!(file_name_from_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_download_all_writes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        // md5("abc")
        let source = FakeSource::new(b"abc");
        let entries = vec![
            entry("http://example.com/one.bin", "900150983cd24fb0d6963f7d28e17f72"),
            entry("http://example.com/two.bin", "900150983cd24fb0d6963f7d28e17f72"),
        ];

        download_all(&source, &entries, &Credentials::default(), dir.path())
            .await
            .unwrap();

        assert!(dir.path().join("one.bin").exists());
        assert!(dir.path().join("two.bin").exists());
        let requests = source.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec!["http://example.com/one.bin", "http://example.com/two.bin"]
        );
    }

    #[tokio::test]
    async fn test_checksum_mismatch_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(b"abc");
        let entries = vec![
            entry("http://example.com/bad.bin", "0000"),
            entry("http://example.com/next.bin", "900150983cd24fb0d6963f7d28e17f72"),
        ];

        // Mismatch is warning-class: the stage still succeeds and the next
        // entry is still fetched.
        download_all(&source, &entries, &Credentials::default(), dir.path())
            .await
            .unwrap();
        assert!(dir.path().join("next.bin").exists());
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![entry("http://example.com/a.bin", "0000")];

        let result =
            download_all(&BrokenSource, &entries, &Credentials::default(), dir.path()).await;
        assert!(matches!(result, Err(DomainError::Download { .. })));
    }
}
