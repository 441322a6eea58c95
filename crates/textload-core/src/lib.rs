//! textload core — error type and loader configuration.

pub mod config;
pub mod error;

pub use config::{ErrorPolicy, LoaderConfig, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
