//! Loader configuration, resolved from the environment with fixed defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Byte length of one section's source window.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

const DEFAULT_TEXTS_DIR: &str = "texts";
const DEFAULT_DB_PATH: &str = "data/textdb.sqlite3";

/// What the driver does when a document fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failed document.
    #[default]
    AbortOnError,
    /// Roll back the failed document, record it, and continue with the next one.
    IsolatePerDocument,
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "abort-on-error" | "abort_on_error" => Ok(Self::AbortOnError),
            "isolate" | "isolate-per-document" | "isolate_per_document" => {
                Ok(Self::IsolatePerDocument)
            }
            other => Err(Error::Config(format!(
                "unknown error policy '{}' (expected 'abort' or 'isolate')",
                other
            ))),
        }
    }
}

/// Top-level loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory whose regular files are loaded.
    pub texts_dir: PathBuf,
    /// SQLite database file holding `texts` and `sections`.
    pub db_path: PathBuf,
    /// Maximum source bytes per section.
    pub chunk_size: usize,
    /// Only load files with this extension (no dot, case-insensitive).
    pub extension: Option<String>,
    pub error_policy: ErrorPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            texts_dir: PathBuf::from(DEFAULT_TEXTS_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            chunk_size: DEFAULT_CHUNK_SIZE,
            extension: None,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl LoaderConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let texts_dir = lookup("TEXTLOAD_TEXTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.texts_dir);
        let db_path = lookup("TEXTLOAD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let chunk_size = match lookup("TEXTLOAD_CHUNK_SIZE") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("invalid TEXTLOAD_CHUNK_SIZE '{}': {}", raw, e))
            })?,
            None => defaults.chunk_size,
        };

        let extension = lookup("TEXTLOAD_EXTENSION")
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty());

        let error_policy = match lookup("TEXTLOAD_ERROR_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.error_policy,
        };

        let config = Self {
            texts_dir,
            db_path,
            chunk_size,
            extension,
            error_policy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
