//! Tabular store trait and error types
//!
//! The store is an opaque grid of string cells addressed by 1-based row and
//! column, the way a spreadsheet worksheet is.

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cell ({row}, {col}) is out of range")]
    OutOfRange { row: usize, col: usize },

    #[error("Worksheet name must not be empty")]
    EmptyWorksheet,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Cell-addressed tabular storage
pub trait TabularStore {
    /// Reads every row, in order
    ///
    /// Each row keeps the width it was written with, trailing empty cells
    /// included.
    fn read_all(&self) -> StoreResult<Vec<Vec<String>>>;

    /// Appends a row after the last one
    fn append_row(&mut self, cells: &[String]) -> StoreResult<()>;

    /// Overwrites a single cell
    ///
    /// # Arguments
    ///
    /// * `row` - 1-based row number; the row must exist
    /// * `col` - 1-based column number; writing past the row's width widens it
    /// * `value` - New cell content
    fn update_cell(&mut self, row: usize, col: usize, value: &str) -> StoreResult<()>;
}
