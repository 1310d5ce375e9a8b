//! Positional row assembly
//!
//! The builder walks every column at the same position, so row `i` of a
//! pass holds the `i`-th URL of each publisher. A URL already in the dedup
//! window leaves its group blank instead of shifting the column.

use crate::config::{ExhaustedPolicy, RowsConfig};
use crate::publishers::Registry;
use crate::rows::{ContentType, DedupWindow, Group, Row};

/// Per-run parameters for [`build_rows`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    /// Date stamp written into every filled group
    pub date: String,
    /// Positions read from every sequence per pass
    pub max_rows: usize,
    pub exhausted: ExhaustedPolicy,
}

impl RowPlan {
    pub fn new(date: impl Into<String>, max_rows: usize, exhausted: ExhaustedPolicy) -> Self {
        Self {
            date: date.into(),
            max_rows,
            exhausted,
        }
    }

    pub fn from_config(date: impl Into<String>, rows: &RowsConfig) -> Self {
        Self::new(date, rows.max_rows_per_cycle, rows.exhausted)
    }
}

/// Result of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    /// Rows with at least one filled group, in output order
    pub rows: Vec<Row>,
    /// The window after every emitted URL was added
    pub window: DedupWindow,
    /// Groups left blank because their URL was already seen
    pub seen_skips: usize,
    /// Rows dropped because every group was blank
    pub dropped: usize,
}

impl RowBatch {
    pub fn emitted(&self) -> usize {
        self.rows.iter().map(|row| row.urls().count()).sum()
    }
}

/// Element offered at `position`, honoring the exhaustion policy
fn offer(sequence: &[String], position: usize, policy: ExhaustedPolicy) -> Option<&str> {
    match sequence.get(position) {
        Some(url) => Some(url),
        None => match policy {
            ExhaustedPolicy::Blank => None,
            ExhaustedPolicy::RepeatLast => sequence.last().map(String::as_str),
        },
    }
}

/// Builds the output rows for one run
///
/// For each pass in [`ContentType::PASSES`] and each position below
/// `plan.max_rows`, one row is produced with a group per publisher then a
/// group per gallery source. Gallery sources are read through a single
/// cursor spanning both passes, at `pass * max_rows + position`.
///
/// # Arguments
///
/// * `registry` - Harvested sequences for every column
/// * `window` - URLs that must not be emitted
/// * `plan` - Date stamp, row limit and exhaustion policy
///
/// # Returns
///
/// The non-blank rows and the updated window. No URL appears in more than
/// one group of the batch, and none that was in `window` on entry.
pub fn build_rows(registry: &Registry, mut window: DedupWindow, plan: &RowPlan) -> RowBatch {
    let mut rows = Vec::new();
    let mut seen_skips = 0;
    let mut dropped = 0;

    let mut group_for =
        |candidate: Option<&str>, content_type: ContentType, window: &mut DedupWindow| {
            match candidate {
                Some(url) if window.insert(url) => Group::Filled {
                    date: plan.date.clone(),
                    content_type,
                    url: url.to_string(),
                },
                Some(_) => {
                    seen_skips += 1;
                    Group::Blank
                }
                None => Group::Blank,
            }
        };

    for (pass, content_type) in ContentType::PASSES.into_iter().enumerate() {
        for position in 0..plan.max_rows {
            let mut groups = Vec::with_capacity(registry.column_count());

            for publisher in registry.publishers() {
                let candidate = offer(publisher.sequence(content_type), position, plan.exhausted);
                groups.push(group_for(candidate, content_type, &mut window));
            }

            let gallery_position = pass * plan.max_rows + position;
            for gallery in registry.galleries() {
                let candidate = offer(&gallery.gallery, gallery_position, plan.exhausted);
                groups.push(group_for(candidate, ContentType::Gallery, &mut window));
            }

            let row = Row::new(groups);
            if row.is_blank() {
                dropped += 1;
            } else {
                rows.push(row);
            }
        }
    }

    RowBatch {
        rows,
        window,
        seen_skips,
        dropped,
    }
}
