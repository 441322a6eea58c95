//! Row types for texts and sections.

use serde::{Deserialize, Serialize};

/// A text row: one ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// A section row: one fixed-size decoded chunk of a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub text_id: i64,
    pub section_number: u32,
    pub content: String,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub texts: i64,
    pub sections: i64,
    pub db_path: String,
    pub db_size_bytes: u64,
}
