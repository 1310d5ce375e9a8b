//! Run orchestration
//!
//! A run has two phases, each reading the store once in bulk:
//! - aggregation: harvest every source, build rows against the dedup
//!   window, append them
//! - audit: measure every pending group and write its metrics back

use crate::audit::{AuditReport, AuditRunner, PerformanceProbe};
use crate::config::{Config, DedupSeed};
use crate::fetch::Fetcher;
use crate::output::{append_rows, SinkReport};
use crate::publishers::Harvester;
use crate::rows::{build_rows, DedupWindow, Row, RowPlan};
use crate::store::{open_store, SqliteSheet, StoreResult, TabularStore};
use std::path::Path;

/// What the aggregation phase did
#[derive(Debug, Clone, Default)]
pub struct AggregateSummary {
    /// Date stamp written into every emitted group
    pub date: String,
    /// Column names in output order
    pub column_names: Vec<String>,
    pub columns: usize,
    /// URLs harvested across every sequence
    pub harvested: usize,
    /// URLs in the dedup window before the build
    pub window_seed: usize,
    pub emitted: usize,
    pub seen_skips: usize,
    /// All-blank rows that were never persisted
    pub dropped: usize,
    pub sink: SinkReport,
    /// Rows handed to the sink
    pub rows: Vec<Row>,
}

/// Opens the configured worksheet
///
/// This is the one failure that ends a run.
pub fn open_worksheet(config: &Config) -> crate::Result<SqliteSheet> {
    let sheet = open_store(
        Path::new(&config.store.database_path),
        &config.store.worksheet,
    )?;
    tracing::info!(
        "Opened worksheet '{}' in {}",
        config.store.worksheet,
        config.store.database_path
    );
    Ok(sheet)
}

/// Builds the harvester from the `[fetch]` and `[user-agent]` sections
pub fn build_harvester(config: &Config) -> crate::Result<Harvester> {
    let fetcher = Fetcher::from_config(&config.fetch, &config.user_agent)?;
    Ok(Harvester::new(fetcher))
}

/// The run's local calendar date, `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Builds the starting dedup window for the configured seed policy
///
/// A failed read under the historical policy is logged and the window
/// starts empty.
pub fn seed_window<S>(store: &S, seed: DedupSeed) -> DedupWindow
where
    S: TabularStore + ?Sized,
{
    match seed {
        DedupSeed::RunOnly => DedupWindow::new(),
        DedupSeed::Historical => match store.read_all() {
            Ok(rows) => DedupWindow::seeded_from_rows(&rows),
            Err(e) => {
                tracing::warn!(
                    "Could not read recorded URLs, starting with an empty window: {}",
                    e
                );
                DedupWindow::new()
            }
        },
    }
}

/// Runs the aggregation phase
///
/// # Arguments
///
/// * `config` - Publisher table and row settings
/// * `harvester` - Network side of the run
/// * `store` - Worksheet read for the window and appended to
/// * `date` - Date stamp for this run
pub async fn aggregate<S>(
    config: &Config,
    harvester: &Harvester,
    store: &mut S,
    date: &str,
) -> AggregateSummary
where
    S: TabularStore + ?Sized,
{
    let window = seed_window(&*store, config.rows.dedup);
    let window_seed = window.len();
    tracing::info!(
        "Dedup window ready: {} recorded URLs ({:?})",
        window_seed,
        config.rows.dedup
    );

    let registry = harvester.build_registry(config).await;

    let plan = RowPlan::from_config(date, &config.rows);
    let batch = build_rows(&registry, window, &plan);
    tracing::info!(
        "Built {} rows: {} URLs emitted, {} already seen, {} empty rows dropped",
        batch.rows.len(),
        batch.emitted(),
        batch.seen_skips,
        batch.dropped
    );

    let sink = append_rows(store, &batch.rows);
    tracing::info!("Appended {} rows ({} failed)", sink.appended, sink.failed);

    let column_names = registry
        .publishers()
        .iter()
        .map(|p| p.name.clone())
        .chain(registry.galleries().iter().map(|g| g.name.clone()))
        .collect();

    AggregateSummary {
        date: date.to_string(),
        column_names,
        columns: registry.column_count(),
        harvested: registry.total_urls(),
        window_seed,
        emitted: batch.emitted(),
        seen_skips: batch.seen_skips,
        dropped: batch.dropped,
        sink,
        rows: batch.rows,
    }
}

/// Runs the audit phase
pub async fn audit<P, S>(config: &Config, probe: P, store: &mut S) -> StoreResult<AuditReport>
where
    P: PerformanceProbe,
    S: TabularStore + ?Sized,
{
    let runner = AuditRunner::from_config(probe, &config.audit);
    let report = runner.run(store).await?;
    tracing::info!(
        "Audit phase complete: {} measured, {} failed",
        report.measured,
        report.failed
    );
    Ok(report)
}
