use crate::store::traits::{StoreError, StoreResult, TabularStore};

/// A worksheet held in memory, used for dry runs and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySheet {
    rows: Vec<Vec<String>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing rows
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl TabularStore for MemorySheet {
    fn read_all(&self) -> StoreResult<Vec<Vec<String>>> {
        Ok(self.rows.clone())
    }

    fn append_row(&mut self, cells: &[String]) -> StoreResult<()> {
        self.rows.push(cells.to_vec());
        Ok(())
    }

    fn update_cell(&mut self, row: usize, col: usize, value: &str) -> StoreResult<()> {
        if col == 0 {
            return Err(StoreError::OutOfRange { row, col });
        }
        let cells = row
            .checked_sub(1)
            .and_then(|index| self.rows.get_mut(index))
            .ok_or(StoreError::OutOfRange { row, col })?;

        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        Ok(())
    }
}
