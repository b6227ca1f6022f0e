pub mod checksum;
pub mod concat;
pub mod convert;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod segment;

pub use pipeline::{Pipeline, Stages};
