//! End-to-end tests for a full run
//!
//! A wiremock server stands in for every publisher, a SQLite worksheet in a
//! temporary directory stands in for the spreadsheet, and a scripted probe
//! stands in for Lighthouse.

use async_trait::async_trait;
use sitemap_sweep::audit::{pending_audits, AuditError, Metrics, PerformanceProbe};
use sitemap_sweep::config::{parse_config, Config};
use sitemap_sweep::fetch::Fetcher;
use sitemap_sweep::store::{open_store, MemorySheet, TabularStore};
use sitemap_sweep::sweep::{aggregate, audit};
use sitemap_sweep::Harvester;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP_WIDTH: usize = 9;

fn test_config(base: &str, dedup: &str) -> Config {
    parse_config(
        &r#"
[fetch]
retries = 1
delay-seconds = 0
timeout-seconds = 5

[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "test@example.com"

[rows]
max-rows-per-cycle = 3
dedup = "DEDUP"

[audit]
retries = 2
delay-seconds = 0
throttle-seconds = 0

[store]
database-path = "unused.db"
worksheet = "Sheet1"

[[publisher]]
name = "Milenio"
shape = "split"
article = { url = "BASE/a/news.xml" }
video = { url = "BASE/a/video.xml" }

[[publisher]]
name = "El Universal"
shape = "inline"
source = { url = "BASE/b/sitemap.xml" }
video-when = [{ contains = "/video/" }]

[[gallery]]
name = "img.Azteca7"
url = "BASE/img/sitemap.xml"
"#
        .replace("BASE", base)
        .replace("DEDUP", dedup),
    )
    .expect("Test config should be valid")
}

fn urlset(urls: &[&str]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts the three sources used by `test_config`
async fn mount_publishers(server: &MockServer) {
    serve(
        server,
        "/a/news.xml",
        urlset(&["https://milenio.example/nota/a1", "https://milenio.example/nota/a2"]),
    )
    .await;
    serve(
        server,
        "/a/video.xml",
        urlset(&["https://milenio.example/video/v1"]),
    )
    .await;
    serve(
        server,
        "/b/sitemap.xml",
        urlset(&[
            "https://eluniversal.example/nacion/b1",
            "https://eluniversal.example/video/b2",
        ]),
    )
    .await;
    serve(
        server,
        "/img/sitemap.xml",
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url><loc>https://azteca.example/galeria</loc>
    <image:image><image:loc>https://cdn.example/1.jpg</image:loc></image:image>
    <image:image><image:loc>https://cdn.example/2.jpg</image:loc></image:image>
  </url>
</urlset>"#
            .to_string(),
    )
    .await;
}

fn harvester(config: &Config) -> Harvester {
    Harvester::new(
        Fetcher::from_config(&config.fetch, &config.user_agent).expect("Failed to build fetcher"),
    )
}

/// The (label, url) pair of every group in a stored row
fn groups(row: &[String]) -> Vec<(String, String)> {
    row.chunks_exact(GROUP_WIDTH)
        .map(|cells| (cells[1].clone(), cells[2].clone()))
        .collect()
}

fn blank() -> (String, String) {
    (String::new(), String::new())
}

fn filled(label: &str, url: &str) -> (String, String) {
    (label.to_string(), url.to_string())
}

/// Fails every video URL, returns the same metrics for the rest
struct FixedProbe {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PerformanceProbe for FixedProbe {
    async fn measure(&self, url: &str) -> Result<Metrics, AuditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("/video/") {
            return Err(AuditError::MissingScore);
        }
        Ok(Metrics {
            score: 64.0,
            cls: Some(0.2),
            lcp: Some(3200.0),
            speed_index: Some(4100.0),
            tbt: Some(350.0),
            fcp: Some(1500.0),
        })
    }
}

#[tokio::test]
async fn test_aggregate_writes_positional_rows() {
    let server = MockServer::start().await;
    mount_publishers(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), "historical");
    let mut store = open_store(&dir.path().join("data/sweep.db"), "Sheet1").unwrap();

    let summary = aggregate(&config, &harvester(&config), &mut store, "2024-05-01").await;

    assert_eq!(summary.columns, 3);
    assert_eq!(summary.harvested, 6);
    assert_eq!(summary.emitted, 6);
    assert_eq!(summary.sink.appended, 3);
    assert_eq!(
        summary.column_names,
        vec!["Milenio", "El Universal", "img.Azteca7"]
    );

    let rows = store.read_all().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == 3 * GROUP_WIDTH));
    assert!(rows.iter().all(|row| row[0] == "2024-05-01"));

    assert_eq!(
        groups(&rows[0]),
        vec![
            filled("article", "https://milenio.example/nota/a1"),
            filled("article", "https://eluniversal.example/nacion/b1"),
            filled("gallery", "https://azteca.example/galeria"),
        ]
    );
    assert_eq!(
        groups(&rows[1]),
        vec![
            filled("article", "https://milenio.example/nota/a2"),
            blank(),
            blank(),
        ]
    );
    assert_eq!(
        groups(&rows[2]),
        vec![
            filled("video", "https://milenio.example/video/v1"),
            filled("video", "https://eluniversal.example/video/b2"),
            blank(),
        ]
    );
}

#[tokio::test]
async fn test_second_run_emits_nothing_new() {
    let server = MockServer::start().await;
    mount_publishers(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), "historical");
    let mut store = open_store(&dir.path().join("sweep.db"), "Sheet1").unwrap();
    let harvester = harvester(&config);

    aggregate(&config, &harvester, &mut store, "2024-05-01").await;
    let second = aggregate(&config, &harvester, &mut store, "2024-05-02").await;

    assert_eq!(second.window_seed, 6);
    assert_eq!(second.emitted, 0);
    assert_eq!(second.seen_skips, 6);
    assert_eq!(second.sink.appended, 0);
    assert_eq!(store.read_all().unwrap().len(), 3);
}

#[tokio::test]
async fn test_historical_window_blanks_recorded_urls() {
    let server = MockServer::start().await;
    mount_publishers(&server).await;

    let mut recorded = vec![String::new(); GROUP_WIDTH];
    recorded[0] = "2024-04-30".to_string();
    recorded[1] = "article".to_string();
    recorded[2] = "https://milenio.example/nota/a1".to_string();
    let mut sheet = MemorySheet::with_rows(vec![recorded]);

    let config = test_config(&server.uri(), "historical");
    let summary = aggregate(&config, &harvester(&config), &mut sheet, "2024-05-01").await;

    assert_eq!(summary.seen_skips, 1);
    assert_eq!(summary.emitted, 5);

    // a1 stays blank rather than pulling a2 forward
    let first_new = &sheet.rows()[1];
    assert_eq!(
        groups(first_new),
        vec![
            blank(),
            filled("article", "https://eluniversal.example/nacion/b1"),
            filled("gallery", "https://azteca.example/galeria"),
        ]
    );
}

#[tokio::test]
async fn test_run_only_window_ignores_store() {
    let server = MockServer::start().await;
    mount_publishers(&server).await;

    let config = test_config(&server.uri(), "run-only");
    let harvester = harvester(&config);
    let mut sheet = MemorySheet::new();

    aggregate(&config, &harvester, &mut sheet, "2024-05-01").await;
    let second = aggregate(&config, &harvester, &mut sheet, "2024-05-01").await;

    assert_eq!(second.window_seed, 0);
    assert_eq!(second.emitted, 6);
    assert_eq!(sheet.rows().len(), 6);
}

#[tokio::test]
async fn test_audit_fills_metric_columns() {
    let server = MockServer::start().await;
    mount_publishers(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), "historical");
    let mut store = open_store(&dir.path().join("sweep.db"), "Sheet1").unwrap();
    aggregate(&config, &harvester(&config), &mut store, "2024-05-01").await;

    let probe = FixedProbe {
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let report = audit(&config, probe, &mut store).await.unwrap();

    assert_eq!(report.candidates, 6);
    assert_eq!(report.measured, 4);
    assert_eq!(report.failed, 2);
    assert_eq!(report.write_failures, 0);

    let rows = store.read_all().unwrap();
    let metrics = ["64", "0.2", "3200", "4100", "350", "1500"];
    assert_eq!(&rows[0][3..9], metrics);
    assert_eq!(&rows[0][12..18], metrics);
    assert_eq!(&rows[0][21..27], metrics);
    assert_eq!(&rows[1][3..9], metrics);
    assert!(rows[1][12..18].iter().all(String::is_empty));

    // videos failed every attempt and remain pending
    let pending: Vec<String> = pending_audits(&rows).into_iter().map(|c| c.url).collect();
    assert_eq!(
        pending,
        vec![
            "https://milenio.example/video/v1",
            "https://eluniversal.example/video/b2",
        ]
    );
}

#[tokio::test]
async fn test_audit_retries_per_group() {
    let mut row = vec![String::new(); GROUP_WIDTH];
    row[0] = "2024-05-01".to_string();
    row[1] = "video".to_string();
    row[2] = "https://milenio.example/video/v1".to_string();
    let mut sheet = MemorySheet::with_rows(vec![row]);

    let config = test_config("http://127.0.0.1:9", "historical");
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = FixedProbe {
        calls: Arc::clone(&calls),
    };
    let report = audit(&config, probe, &mut sheet).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
