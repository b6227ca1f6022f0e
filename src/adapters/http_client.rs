use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::domain::{Credentials, DomainError};
use crate::ports::RemoteSource;

/// HTTP download adapter backed by reqwest.
///
/// The response body is streamed to a `.download` sibling first and renamed
/// into place only after the transfer completes, so an interrupted transfer
/// never leaves a plausible-looking partial file at the destination.
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new() -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("voxprep/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteSource for ReqwestSource {
    async fn download(
        &self,
        url: &str,
        credentials: &Credentials,
        dest: &Path,
    ) -> Result<(), DomainError> {
        use futures_util::StreamExt;
        use tokio::io::AsyncWriteExt;

        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| {
                warn!(url = url, error = %e, "Transport failure");
                DomainError::Download {
                    url: url.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = %status, "Server rejected download");
            return Err(DomainError::Download {
                url: url.to_string(),
            });
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = dest.with_extension("download");
        let cleanup_temp = || {
            let temp = temp_path.clone();
            async move {
                let _ = tokio::fs::remove_file(&temp).await;
            }
        };

        let mut file = match tokio::fs::File::create(&temp_path).await {
            Ok(f) => f,
            Err(e) => {
                cleanup_temp().await;
                return Err(DomainError::Io(e.to_string()));
            }
        };

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    drop(file);
                    cleanup_temp().await;
                    warn!(url = url, error = %e, "Transfer interrupted");
                    return Err(DomainError::Download {
                        url: url.to_string(),
                    });
                }
            };

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                cleanup_temp().await;
                return Err(DomainError::Io(e.to_string()));
            }

            downloaded += chunk.len() as u64;
        }

        if let Err(e) = file.flush().await {
            drop(file);
            cleanup_temp().await;
            return Err(DomainError::Io(e.to_string()));
        }
        drop(file);

        if let Err(e) = tokio::fs::rename(&temp_path, dest).await {
            cleanup_temp().await;
            return Err(DomainError::Io(e.to_string()));
        }

        info!(url = url, dest = ?dest, size = downloaded, "File downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(ReqwestSource::new().is_ok());
    }
}
