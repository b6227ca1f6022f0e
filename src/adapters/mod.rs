pub mod config_store;
pub mod ffmpeg;
pub mod http_client;

pub use config_store::TomlConfigStore;
pub use ffmpeg::FfmpegTranscoder;
pub use http_client::ReqwestSource;
