pub mod config;
pub mod http;
pub mod transcoder;

pub use config::ConfigStore;
pub use http::RemoteSource;
pub use transcoder::AudioTranscoder;
