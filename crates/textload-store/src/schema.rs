//! Database schema SQL.

/// Core tables: texts, sections.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS texts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sections (
    text_id INTEGER NOT NULL REFERENCES texts(id) ON DELETE CASCADE,
    section_number INTEGER NOT NULL CHECK (section_number >= 1),
    content TEXT NOT NULL,
    UNIQUE (text_id, section_number)
);

CREATE INDEX IF NOT EXISTS idx_texts_name ON texts(name);
"#;
