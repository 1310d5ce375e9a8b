//! Tabular store for output rows
//!
//! This module contains:
//! - The cell-addressed `TabularStore` trait
//! - A SQLite implementation with one worksheet per name in a database file
//! - An in-memory implementation for dry runs and tests

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemorySheet;
pub use sqlite::SqliteSheet;
pub use traits::{StoreError, StoreResult, TabularStore};

use std::path::Path;

/// Opens the configured worksheet
///
/// This is the only store failure that stops a run.
pub fn open_store(path: &Path, worksheet: &str) -> StoreResult<SqliteSheet> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteSheet::open(path, worksheet)
}
