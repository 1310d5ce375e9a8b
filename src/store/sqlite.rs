//! SQLite-backed worksheet
//!
//! This module provides a SQLite implementation of the TabularStore trait.

use crate::store::schema::initialize_schema;
use crate::store::traits::{StoreError, StoreResult, TabularStore};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// One named worksheet inside a SQLite database file
pub struct SqliteSheet {
    conn: Connection,
    worksheet: String,
}

impl SqliteSheet {
    /// Opens (or creates) the database and selects a worksheet
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `worksheet` - Worksheet name; created implicitly on first append
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSheet)` - Database opened and schema in place
    /// * `Err(StoreError)` - Failed to open or initialize the database
    pub fn open(path: &Path, worksheet: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::with_connection(conn, worksheet)
    }

    /// Creates an in-memory database
    pub fn open_in_memory(worksheet: &str) -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, worksheet)
    }

    fn with_connection(conn: Connection, worksheet: &str) -> StoreResult<Self> {
        if worksheet.trim().is_empty() {
            return Err(StoreError::EmptyWorksheet);
        }
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            worksheet: worksheet.to_string(),
        })
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    fn row_width(&self, row: usize) -> StoreResult<Option<usize>> {
        let width: Option<i64> = self
            .conn
            .query_row(
                "SELECT width FROM sheet_rows WHERE worksheet = ?1 AND row_index = ?2",
                params![self.worksheet, row as i64],
                |r| r.get(0),
            )
            .optional()?;
        Ok(width.map(|w| w as usize))
    }
}

impl TabularStore for SqliteSheet {
    fn read_all(&self) -> StoreResult<Vec<Vec<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT width FROM sheet_rows WHERE worksheet = ?1 ORDER BY row_index",
        )?;
        let mut rows: Vec<Vec<String>> = stmt
            .query_map(params![self.worksheet], |r| r.get::<_, i64>(0))?
            .map(|width| width.map(|w| vec![String::new(); w as usize]))
            .collect::<Result<_, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT row_index, col_index, value FROM sheet_cells WHERE worksheet = ?1",
        )?;
        let cells = stmt.query_map(params![self.worksheet], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, i64>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?;

        for cell in cells {
            let (row, col, value) = cell?;
            // Row indices are assigned densely from 1 by append_row
            if let Some(slot) = rows
                .get_mut((row - 1) as usize)
                .and_then(|r| r.get_mut((col - 1) as usize))
            {
                *slot = value;
            }
        }

        Ok(rows)
    }

    fn append_row(&mut self, cells: &[String]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(row_index), 0) + 1 FROM sheet_rows WHERE worksheet = ?1",
            params![self.worksheet],
            |r| r.get(0),
        )?;

        tx.execute(
            "INSERT INTO sheet_rows (worksheet, row_index, width, appended_at) VALUES (?1, ?2, ?3, ?4)",
            params![self.worksheet, next, cells.len() as i64, Utc::now().to_rfc3339()],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO sheet_cells (worksheet, row_index, col_index, value) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (col, value) in cells.iter().enumerate() {
                if !value.is_empty() {
                    insert.execute(params![self.worksheet, next, (col + 1) as i64, value])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn update_cell(&mut self, row: usize, col: usize, value: &str) -> StoreResult<()> {
        if row == 0 || col == 0 {
            return Err(StoreError::OutOfRange { row, col });
        }
        let width = self
            .row_width(row)?
            .ok_or(StoreError::OutOfRange { row, col })?;

        if col > width {
            self.conn.execute(
                "UPDATE sheet_rows SET width = ?1 WHERE worksheet = ?2 AND row_index = ?3",
                params![col as i64, self.worksheet, row as i64],
            )?;
        }

        if value.is_empty() {
            self.conn.execute(
                "DELETE FROM sheet_cells WHERE worksheet = ?1 AND row_index = ?2 AND col_index = ?3",
                params![self.worksheet, row as i64, col as i64],
            )?;
        } else {
            self.conn.execute(
                "INSERT OR REPLACE INTO sheet_cells (worksheet, row_index, col_index, value) VALUES (?1, ?2, ?3, ?4)",
                params![self.worksheet, row as i64, col as i64, value],
            )?;
        }

        Ok(())
    }
}
