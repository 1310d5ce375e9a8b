//! Human-readable run summaries

use crate::audit::AuditReport;
use crate::rows::{Group, Row};
use crate::sweep::AggregateSummary;
use std::fmt;

/// Everything a run did, printed at the end of `main`
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub aggregate: Option<AggregateSummary>,
    pub audit: Option<AuditReport>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sweep Summary ===")?;

        if let Some(aggregate) = &self.aggregate {
            writeln!(f)?;
            writeln!(f, "Aggregation ({}):", aggregate.date)?;
            writeln!(f, "  Columns: {}", aggregate.columns)?;
            writeln!(f, "  URLs harvested: {}", aggregate.harvested)?;
            writeln!(f, "  Already recorded: {}", aggregate.window_seed)?;
            writeln!(f, "  URLs emitted: {}", aggregate.emitted)?;
            writeln!(f, "  Skipped as duplicates: {}", aggregate.seen_skips)?;
            writeln!(
                f,
                "  Rows written: {} ({} failed, {} empty rows dropped)",
                aggregate.sink.appended, aggregate.sink.failed, aggregate.dropped
            )?;
        }

        if let Some(audit) = &self.audit {
            writeln!(f)?;
            writeln!(f, "Audit:")?;
            writeln!(f, "  Pending groups: {}", audit.candidates)?;
            writeln!(f, "  Measured: {}", audit.measured)?;
            writeln!(f, "  Failed: {}", audit.failed)?;
            if audit.write_failures > 0 {
                writeln!(f, "  Metric cells not written: {}", audit.write_failures)?;
            }
        }

        Ok(())
    }
}

/// Prints the filled groups of each row, one line per group
pub fn print_rows(rows: &[Row], columns: &[String]) {
    for (index, row) in rows.iter().enumerate() {
        println!("Row {}:", index + 1);
        for (column, group) in row.groups().iter().enumerate() {
            if let Group::Filled {
                date,
                content_type,
                url,
            } = group
            {
                let name = columns.get(column).map(String::as_str).unwrap_or("?");
                println!("  [{}] {} {} {}", name, date, content_type, url);
            }
        }
    }
}
