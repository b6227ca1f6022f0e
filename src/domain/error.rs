use thiserror::Error;

/// Domain-level errors for voxprep.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error(
        "Download failed for {url}. If the download fails repeatedly, \
         use the alternate mirror listed on the corpus website."
    )]
    Download { url: String },

    #[error("Conversion failed for {path}")]
    Conversion { path: String },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<zip::result::ZipError> for DomainError {
    fn from(err: zip::result::ZipError) -> Self {
        DomainError::Archive(err.to_string())
    }
}

impl From<hound::Error> for DomainError {
    fn from(err: hound::Error) -> Self {
        DomainError::Audio(err.to_string())
    }
}
