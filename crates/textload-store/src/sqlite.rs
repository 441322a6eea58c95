//! SQLite-backed store for texts and their sections.
//!
//! Writes go through a [`TextWriter`], which wraps one transaction per
//! document. Dropping a writer without calling [`TextWriter::commit`] rolls
//! the transaction back, so a failed document leaves no rows behind.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use textload_core::{Error, Result};

/// Owner of the single store connection used for a whole run.
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the database file at `db_path`, creating parent
    /// directories and the schema as needed.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Connection(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self { conn, db_path };
        info!(
            "SqliteStore opened: {} texts, {} sections, path={}",
            store.count_texts()?,
            store.count_sections()?,
            store.db_path.display()
        );
        Ok(store)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::Connection(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| {
            Error::Connection(format!("cannot open {}: {}", db_path.display(), e))
        })?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))
    }

    /// Start the transaction for one document.
    pub fn begin_text(&mut self) -> Result<TextWriter<'_>> {
        let tx = self.conn.transaction().map_err(db_err)?;
        Ok(TextWriter { tx })
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        let path = self.db_path;
        self.conn
            .close()
            .map_err(|(_, e)| Error::Database(format!("close failed: {}", e)))?;
        debug!("SqliteStore closed: {}", path.display());
        Ok(())
    }

    // ---------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------

    pub fn get_text(&self, text_id: i64) -> Result<Option<Text>> {
        self.conn
            .prepare_cached("SELECT id, name, created_at FROM texts WHERE id = ?1")
            .map_err(db_err)?
            .query_row(params![text_id], row_to_text)
            .optional()
            .map_err(db_err)
    }

    /// All texts with the given name, oldest first.
    pub fn find_texts_by_name(&self, name: &str) -> Result<Vec<Text>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, created_at FROM texts WHERE name = ?1 ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![name], row_to_text)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    pub fn list_texts(&self) -> Result<Vec<Text>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, created_at FROM texts ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], row_to_text)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    /// Sections of a text in section-number order.
    pub fn get_sections(&self, text_id: i64) -> Result<Vec<Section>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT text_id, section_number, content FROM sections
                 WHERE text_id = ?1 ORDER BY section_number",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![text_id], |row| {
                Ok(Section {
                    text_id: row.get(0)?,
                    section_number: row.get(1)?,
                    content: row.get(2)?,
                })
            })
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    pub fn count_texts(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))
            .map_err(db_err)
    }

    pub fn count_sections(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sections", [], |row| row.get(0))
            .map_err(db_err)
    }

    pub fn get_stats(&self) -> Result<StoreStats> {
        let db_size_bytes = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);
        Ok(StoreStats {
            texts: self.count_texts()?,
            sections: self.count_sections()?,
            db_path: self.db_path.display().to_string(),
            db_size_bytes,
        })
    }
}

/// One document's write transaction.
pub struct TextWriter<'conn> {
    tx: Transaction<'conn>,
}

impl TextWriter<'_> {
    /// Insert a text row and return its assigned id.
    pub fn create_text(&self, name: &str, created_at: i64) -> Result<i64> {
        let id = self
            .tx
            .prepare_cached("INSERT INTO texts (name, created_at) VALUES (?1, ?2)")
            .map_err(db_err)?
            .insert(params![name, created_at])
            .map_err(db_err)?;
        Ok(id)
    }

    /// Insert one section row. Numbers must be supplied as 1, 2, 3, ...
    pub fn append_section(&self, text_id: i64, section_number: u32, content: &str) -> Result<()> {
        self.tx
            .prepare_cached(
                "INSERT INTO sections (text_id, section_number, content) VALUES (?1, ?2, ?3)",
            )
            .map_err(db_err)?
            .execute(params![text_id, section_number, content])
            .map_err(|e| {
                Error::Database(format!(
                    "section {} of text {}: {}",
                    section_number, text_id, e
                ))
            })?;
        Ok(())
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(db_err)
    }
}

fn row_to_text(row: &rusqlite::Row<'_>) -> rusqlite::Result<Text> {
    Ok(Text {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}
