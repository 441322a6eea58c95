//! Load driver: file → fixed-size sections → one transaction per text.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::chunking::ByteChunker;
use crate::report::{DocumentFailure, IngestReport};
use crate::scan::{enumerate_documents, DocumentEntry};
use textload_core::{Error, ErrorPolicy, LoaderConfig, Result};
use textload_store::SqliteStore;

/// What one committed document produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub name: String,
    pub text_id: i64,
    pub sections: usize,
    pub bytes: u64,
    /// U+FFFD substitutions made while decoding sections.
    pub replaced_chars: usize,
}

/// Open the configured store, load `config.texts_dir` into it, and close it.
///
/// The source directory and chunk size are checked before the store is
/// opened, so a bad invocation creates no database file. On a failed run the
/// store is dropped, which closes the connection.
pub fn load_directory(config: &LoaderConfig) -> Result<IngestReport> {
    if !config.texts_dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} directory does not exist", config.texts_dir.display()),
        )));
    }
    let chunker = ByteChunker::new(config.chunk_size)?;

    let mut store = SqliteStore::open(&config.db_path)?;
    let report = Loader::new(&mut store, chunker, config.error_policy)
        .run(&config.texts_dir, config.extension.as_deref())?;
    store.close()?;
    Ok(report)
}

/// Loads documents into the store, one transaction per document.
pub struct Loader<'a> {
    store: &'a mut SqliteStore,
    chunker: ByteChunker,
    policy: ErrorPolicy,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a mut SqliteStore, chunker: ByteChunker, policy: ErrorPolicy) -> Self {
        Self {
            store,
            chunker,
            policy,
        }
    }

    pub fn from_config(store: &'a mut SqliteStore, config: &LoaderConfig) -> Result<Self> {
        let chunker = ByteChunker::new(config.chunk_size)?;
        Ok(Self::new(store, chunker, config.error_policy))
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Load every document in `dir`, in path order.
    ///
    /// Under [`ErrorPolicy::AbortOnError`] the first failure is returned and
    /// the remaining documents are not attempted. Under
    /// [`ErrorPolicy::IsolatePerDocument`] failures are recorded in the
    /// report and the run continues.
    pub fn run(&mut self, dir: &Path, extension: Option<&str>) -> Result<IngestReport> {
        let entries = enumerate_documents(dir, extension)?;
        if entries.is_empty() {
            warn!("No documents found in {}", dir.display());
        }

        let mut report = IngestReport::default();
        for entry in &entries {
            info!(
                "Processing {}...",
                entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default()
            );

            match self.ingest_file(entry) {
                Ok(outcome) => report.record(&outcome),
                Err(e) => match self.policy {
                    ErrorPolicy::AbortOnError => return Err(e),
                    ErrorPolicy::IsolatePerDocument => {
                        error!("Failed to load '{}': {}", entry.name, e);
                        report.failures.push(DocumentFailure {
                            name: entry.name.clone(),
                            path: entry.path.display().to_string(),
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            "Loaded {} documents ({} sections, {} failed)",
            report.documents,
            report.sections,
            report.failures.len()
        );
        Ok(report)
    }

    /// Read a file completely and load it as one text.
    pub fn ingest_file(&mut self, entry: &DocumentEntry) -> Result<DocumentOutcome> {
        let data = std::fs::read(&entry.path)?;
        self.ingest_bytes(&entry.name, &data)
    }

    /// Store `data` as a text named `name` with its sections.
    ///
    /// Nothing is persisted unless every insert succeeds; an error drops the
    /// open transaction, which rolls it back.
    pub fn ingest_bytes(&mut self, name: &str, data: &[u8]) -> Result<DocumentOutcome> {
        let writer = self.store.begin_text()?;
        let text_id = writer.create_text(name, chrono::Utc::now().timestamp_millis())?;

        let mut sections = 0;
        let mut replaced_chars = 0;
        for section in self.chunker.sections(data) {
            let decoded = section.decode();
            replaced_chars += decoded.replaced;
            writer.append_section(text_id, section.number, &decoded.text)?;
            sections += 1;
        }
        debug!("Appended {} sections to text {}", sections, text_id);

        writer.commit()?;
        info!(
            "Stored '{}' as text {} with {} sections",
            name, text_id, sections
        );

        Ok(DocumentOutcome {
            name: name.to_string(),
            text_id,
            sections,
            bytes: data.len() as u64,
            replaced_chars,
        })
    }
}
