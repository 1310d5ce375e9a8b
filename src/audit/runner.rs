//! Fills in metrics for every group that has none yet
//!
//! The runner reads the store once, then for each pending group measures
//! the URL (with its own retry policy) and writes the six metric cells.
//! A group that still fails after its retries keeps empty cells, so the
//! next run picks it up again.

use crate::audit::probe::PerformanceProbe;
use crate::config::AuditConfig;
use crate::fetch::RetryPolicy;
use crate::rows::{ContentType, GROUP_WIDTH, SCORE_OFFSET};
use crate::store::{StoreResult, TabularStore};
use std::time::Duration;

/// A group waiting for metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCandidate {
    /// 1-based row number in the store
    pub row: usize,
    /// 0-based group index within the row
    pub group: usize,
    pub content_type: ContentType,
    pub url: String,
}

impl AuditCandidate {
    /// 1-based store column of the group's first metric cell
    pub fn score_column(&self) -> usize {
        self.group * GROUP_WIDTH + SCORE_OFFSET
    }
}

/// Lists every group with a known content type, an `http` URL and an empty
/// score cell
///
/// Rows may hold any number of complete groups; a trailing partial group is
/// ignored.
pub fn pending_audits(rows: &[Vec<String>]) -> Vec<AuditCandidate> {
    let mut candidates = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        for (group, cells) in row.chunks_exact(GROUP_WIDTH).enumerate() {
            let Some(content_type) = ContentType::from_label(&cells[1]) else {
                continue;
            };
            let url = cells[2].trim();
            if !url.starts_with("http") || !cells[SCORE_OFFSET - 1].trim().is_empty() {
                continue;
            }
            candidates.push(AuditCandidate {
                row: index + 1,
                group,
                content_type,
                url: url.to_string(),
            });
        }
    }

    candidates
}

/// Totals for one audit phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub candidates: usize,
    pub measured: usize,
    pub failed: usize,
    /// Metric cells that could not be written
    pub write_failures: usize,
}

/// Drives a [`PerformanceProbe`] over the pending groups of a store
pub struct AuditRunner<P> {
    probe: P,
    policy: RetryPolicy,
    throttle: Duration,
}

impl<P: PerformanceProbe> AuditRunner<P> {
    pub fn new(probe: P, policy: RetryPolicy, throttle: Duration) -> Self {
        Self {
            probe,
            policy,
            throttle,
        }
    }

    pub fn from_config(probe: P, config: &AuditConfig) -> Self {
        Self::new(
            probe,
            RetryPolicy::from_secs(config.retries, config.delay_seconds),
            Duration::from_secs(config.throttle_seconds),
        )
    }

    /// Audits every pending group in `store`
    ///
    /// # Returns
    ///
    /// * `Ok(AuditReport)` - Totals; failed measurements and failed cell
    ///   writes are counted, not raised
    /// * `Err(StoreError)` - The initial read failed
    pub async fn run<S>(&self, store: &mut S) -> StoreResult<AuditReport>
    where
        S: TabularStore + ?Sized,
    {
        let rows = store.read_all()?;
        let candidates = pending_audits(&rows);
        let mut report = AuditReport {
            candidates: candidates.len(),
            ..AuditReport::default()
        };

        tracing::info!("Starting audit phase: {} pending groups", candidates.len());

        for candidate in &candidates {
            tracing::info!(
                "Auditing {} {} (row {})",
                candidate.content_type,
                candidate.url,
                candidate.row
            );

            let url = candidate.url.as_str();
            let measured = self
                .policy
                .run(move |_| self.probe.measure(url), |_| true)
                .await;

            match measured {
                Ok(metrics) => {
                    tracing::info!("Score {} for {}", metrics.score, candidate.url);
                    report.measured += 1;

                    let first = candidate.score_column();
                    for (offset, value) in metrics.cells().iter().enumerate() {
                        let col = first + offset;
                        if let Err(e) = store.update_cell(candidate.row, col, value) {
                            tracing::warn!(
                                "Failed to write metric at row {}, column {}: {}",
                                candidate.row,
                                col,
                                e
                            );
                            report.write_failures += 1;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Audit failed for {}, leaving metrics empty: {}",
                        candidate.url,
                        e
                    );
                    report.failed += 1;
                }
            }

            tokio::time::sleep(self.throttle).await;
        }

        Ok(report)
    }
}
