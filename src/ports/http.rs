use std::path::Path;

use async_trait::async_trait;

use crate::domain::{Credentials, DomainError};

/// Port for fetching remote corpus files.
/// All network traffic must go through this interface.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Download one URL to the given path using HTTP basic credentials.
    ///
    /// Exactly one attempt is made; whether a failure aborts the run is the
    /// caller's policy.
    async fn download(
        &self,
        url: &str,
        credentials: &Credentials,
        dest: &Path,
    ) -> Result<(), DomainError>;
}
