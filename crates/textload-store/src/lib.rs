//! textload store — SQLite tables for texts and their ordered sections.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{SqliteStore, TextWriter};
pub use types::*;
