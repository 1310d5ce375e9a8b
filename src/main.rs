//! Sitemap-Sweep main entry point
//!
//! This is the command-line interface for the Sitemap-Sweep aggregator.

use anyhow::Context;
use clap::Parser;
use sitemap_sweep::audit::LighthouseProbe;
use sitemap_sweep::config::{load_config_with_hash, Config};
use sitemap_sweep::output::{print_rows, RunReport};
use sitemap_sweep::store::{MemorySheet, SqliteSheet, TabularStore};
use sitemap_sweep::sweep::{
    aggregate, audit, build_harvester, open_worksheet, today, AggregateSummary,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Sweep: a news sitemap aggregator
///
/// Sitemap-Sweep collects newly published article, video and gallery URLs
/// from publisher sitemaps, appends the ones not seen before to a worksheet,
/// then runs Lighthouse on every URL that has no metrics yet.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A news sitemap aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to the built-in publisher table)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Harvest and print the rows that would be written, without writing
    #[arg(long, conflicts_with_all = ["audit_only", "skip_audit"])]
    dry_run: bool,

    /// Stop after the aggregation phase
    #[arg(long, conflicts_with = "audit_only")]
    skip_audit: bool,

    /// Only fill in missing metrics for rows already in the store
    #[arg(long)]
    audit_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("Using built-in publisher table"),
    }
    let (config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Opening the store is the one failure that ends the run
    let mut store = open_worksheet(&config).with_context(|| {
        format!(
            "Failed to open worksheet '{}' in {}",
            config.store.worksheet, config.store.database_path
        )
    })?;

    if cli.dry_run {
        return handle_dry_run(&config, &store).await;
    }

    let mut report = RunReport::default();

    if !cli.audit_only {
        report.aggregate = Some(handle_aggregate(&config, &mut store).await?);
    }

    if !cli.skip_audit {
        let probe = LighthouseProbe::from_config(&config.audit);
        match audit(&config, probe, &mut store).await {
            Ok(audit_report) => report.audit = Some(audit_report),
            Err(e) => tracing::error!("Audit phase could not read the store: {}", e),
        }
    }

    if !cli.quiet {
        print!("{}", report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_sweep=info,warn"),
            1 => EnvFilter::new("sitemap_sweep=debug,info"),
            2 => EnvFilter::new("sitemap_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the aggregation phase against the real worksheet
async fn handle_aggregate(
    config: &Config,
    store: &mut SqliteSheet,
) -> anyhow::Result<AggregateSummary> {
    let date = today();
    tracing::info!(
        "Aggregating {} publishers and {} gallery sources for {}",
        config.publishers.len(),
        config.galleries.len(),
        date
    );

    let harvester = build_harvester(config).context("Failed to build HTTP client")?;
    Ok(aggregate(config, &harvester, store, &date).await)
}

/// Handles the --dry-run mode: builds rows against a scratch copy of the
/// worksheet and prints them
async fn handle_dry_run(config: &Config, store: &SqliteSheet) -> anyhow::Result<()> {
    println!("=== Sitemap-Sweep Dry Run ===\n");

    let recorded = store
        .read_all()
        .context("Failed to read existing rows")?;
    let mut scratch = MemorySheet::with_rows(recorded);

    let harvester = build_harvester(config).context("Failed to build HTTP client")?;
    let summary = aggregate(config, &harvester, &mut scratch, &today()).await;

    print_rows(&summary.rows, &summary.column_names);
    println!();
    print!(
        "{}",
        RunReport {
            aggregate: Some(summary),
            audit: None,
        }
    );
    println!("\n✓ Nothing was written to {}", config.store.database_path);

    Ok(())
}
