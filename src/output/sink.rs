//! Row persistence
//!
//! One append call per row. A failed append is logged and the run moves on
//! to the next row.

use crate::rows::Row;
use crate::store::TabularStore;

/// Totals for one sink pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub appended: usize,
    pub failed: usize,
    /// Rows refused because every group was blank
    pub skipped_blank: usize,
}

/// Appends every non-blank row to `store`, in order
///
/// # Arguments
///
/// * `store` - Destination worksheet
/// * `rows` - Rows produced by the row builder
///
/// # Returns
///
/// How many rows were written, failed, or skipped
pub fn append_rows<S>(store: &mut S, rows: &[Row]) -> SinkReport
where
    S: TabularStore + ?Sized,
{
    let mut report = SinkReport::default();

    for (index, row) in rows.iter().enumerate() {
        if row.is_blank() {
            report.skipped_blank += 1;
            continue;
        }

        match store.append_row(&row.cells()) {
            Ok(()) => {
                tracing::debug!("Appended row {} ({} URLs)", index, row.urls().count());
                report.appended += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to append row {}, skipping: {}", index, e);
                report.failed += 1;
            }
        }
    }

    report
}
