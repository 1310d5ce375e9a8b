//! Database schema definitions
//!
//! A database file holds any number of worksheets. Rows record their width
//! so that trailing empty cells survive a round trip; only non-empty cells
//! are stored.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One record per appended row
CREATE TABLE IF NOT EXISTS sheet_rows (
    worksheet TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    width INTEGER NOT NULL,
    appended_at TEXT NOT NULL,
    PRIMARY KEY (worksheet, row_index)
);

-- Non-empty cells
CREATE TABLE IF NOT EXISTS sheet_cells (
    worksheet TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    col_index INTEGER NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (worksheet, row_index, col_index)
);

CREATE INDEX IF NOT EXISTS idx_sheet_cells_row ON sheet_cells(worksheet, row_index);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
