//! Source directory enumeration.

use std::path::{Path, PathBuf};

use tracing::debug;

use textload_core::Result;

/// A regular file to be loaded as one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub path: PathBuf,
    /// Filename with its final extension removed.
    pub name: String,
}

/// Logical document name: the filename without its last extension.
pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// List the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories and other non-file entries are skipped. Symlinks are
/// followed; a dangling link is skipped, any other stat failure is an error.
/// When `extension` is given, only files with that extension (compared
/// case-insensitively, no leading dot) are kept.
pub fn enumerate_documents(dir: &Path, extension: Option<&str>) -> Result<Vec<DocumentEntry>> {
    let wanted = extension.map(|e| e.trim_start_matches('.').to_lowercase());
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        let is_file = match std::fs::metadata(&path) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !is_file {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }

        if let Some(wanted) = &wanted {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            if ext.as_deref() != Some(wanted.as_str()) {
                continue;
            }
        }

        let name = document_name(&path);
        entries.push(DocumentEntry { path, name });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
