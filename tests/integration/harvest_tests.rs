//! Integration tests for fetching and harvesting
//!
//! These tests use wiremock to serve sitemaps, listings and failures, and
//! check the retry, decompression and extraction behavior end-to-end.

use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_sweep::config::{
    parse_config, AdapterSpec, FeedFormat, GalleryEntry, PublisherEntry, SourceSpec, UrlRule,
    UserAgentConfig,
};
use sitemap_sweep::fetch::{build_http_client, Fetcher, RetryPolicy};
use sitemap_sweep::Harvester;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestSweep".to_string(),
        crawler_version: "1.0".to_string(),
        contact_url: "https://example.com/about".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn fetcher(attempts: u32) -> Fetcher {
    let client =
        build_http_client(&user_agent(), Duration::from_secs(5)).expect("Failed to build client");
    Fetcher::new(client, RetryPolicy::new(attempts, Duration::ZERO))
}

fn source(url: String) -> SourceSpec {
    SourceSpec {
        url,
        format: FeedFormat::Sitemap,
        resolve_index: false,
        include: vec![],
        exclude: vec![],
        host: None,
        require: vec![],
        reject: vec![],
    }
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_fetch_succeeds_on_third_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news.xml"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let body = fetcher(3)
        .fetch(&format!("{}/news.xml", server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some(b"ok".as_slice()));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_fetch_retries_after_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("on time"))
        .mount(&server)
        .await;

    let client = build_http_client(&user_agent(), Duration::from_millis(500))
        .expect("Failed to build client");
    let fetcher = Fetcher::new(client, RetryPolicy::new(3, Duration::ZERO));

    let body = fetcher
        .fetch(&format!("{}/slow.xml", server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some(b"on time".as_slice()));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_fetch_gives_up_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let body = fetcher(3)
        .fetch(&format!("{}/news.xml", server.uri()))
        .await;

    assert!(body.is_none());
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_gzipped_sitemap_is_inflated() {
    let server = MockServer::start().await;
    let urls = vec![
        "https://www.nytimes.com/2024/05/01/world/a.html".to_string(),
        "https://www.nytimes.com/2024/05/01/world/b.html".to_string(),
    ];

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(urlset(&urls).as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/news.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(compressed))
        .mount(&server)
        .await;

    let harvester = Harvester::new(fetcher(3));
    let harvested = harvester
        .harvest_source(&source(format!("{}/news.xml.gz", server.uri())))
        .await
        .unwrap();

    assert_eq!(harvested, urls);
}

#[tokio::test]
async fn test_malformed_payload_retries_whole_cycle() {
    let server = MockServer::start().await;
    let urls = vec!["https://example.com/nota/1".to_string()];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&urls)))
        .mount(&server)
        .await;

    let harvester = Harvester::new(fetcher(3));
    let harvested = harvester
        .harvest_source(&source(format!("{}/sitemap.xml", server.uri())))
        .await
        .unwrap();

    assert_eq!(harvested, urls);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_sitemap_index_resolves_latest_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    let index = format!(
        r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/A.xml</loc><lastmod>2024-01-01</lastmod></sitemap>
  <sitemap><loc>{base}/B.xml</loc><lastmod>2024-03-05</lastmod></sitemap>
  <sitemap><loc>{base}/C.xml</loc><lastmod>2023-12-31</lastmod></sitemap>
</sitemapindex>"#
    );

    Mock::given(method("GET"))
        .and(path("/video.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/B.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&["https://example.com/video/b".to_string()])),
        )
        .mount(&server)
        .await;

    let harvester = Harvester::new(fetcher(3));
    let indexed = SourceSpec {
        resolve_index: true,
        ..source(format!("{}/video.xml", base))
    };

    assert_eq!(
        harvester.harvest_source(&indexed).await.unwrap(),
        vec!["https://example.com/video/b"]
    );
}

#[tokio::test]
async fn test_listing_and_pattern_sources() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemaps/latest.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "https://heraldo.example/Video/clip-1\nhttps://heraldo.example/nacional/nota-1\n\n",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mrss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<item><link>https://as.com/opinion/columna.html</link>
<media:content url="https://as.com/videos/resumen.html"/></item>"#,
        ))
        .mount(&server)
        .await;

    let harvester = Harvester::new(fetcher(1));

    let videos = SourceSpec {
        format: FeedFormat::Listing,
        include: vec!["video".to_string()],
        ..source(format!("{}/sitemaps/latest.txt", server.uri()))
    };
    assert_eq!(
        harvester.harvest_source(&videos).await.unwrap(),
        vec!["https://heraldo.example/Video/clip-1"]
    );

    let opinion = SourceSpec {
        format: FeedFormat::Pattern,
        host: Some("as.com".to_string()),
        require: vec![UrlRule::Contains("/opinion/".to_string())],
        reject: vec![UrlRule::Contains("video".to_string())],
        ..source(format!("{}/mrss", server.uri()))
    };
    assert_eq!(
        harvester.harvest_source(&opinion).await.unwrap(),
        vec!["https://as.com/opinion/columna.html"]
    );
}

#[tokio::test]
async fn test_failed_publisher_yields_empty_sequences() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/broken/news.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good/news.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[
            "https://good.example/nota/1".to_string(),
            "https://good.example/video/2".to_string(),
        ])))
        .mount(&server)
        .await;

    let config = parse_config(
        &r#"
[fetch]
retries = 2
delay-seconds = 0
timeout-seconds = 5

[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "test@example.com"

[rows]
max-rows-per-cycle = 3

[audit]
retries = 1
delay-seconds = 0
throttle-seconds = 0

[store]
database-path = "unused.db"
worksheet = "Sheet1"

[[publisher]]
name = "Broken"
shape = "split"
article = { url = "BASE/broken/news.xml" }
video = { url = "BASE/broken/news.xml" }

[[publisher]]
name = "Good"
shape = "inline"
source = { url = "BASE/good/news.xml" }
video-when = [{ contains = "/video/" }]
"#
        .replace("BASE", &base),
    )
    .expect("Test config should be valid");

    let harvester = Harvester::new(
        Fetcher::from_config(&config.fetch, &config.user_agent).expect("Failed to build fetcher"),
    );
    let registry = harvester.build_registry(&config).await;

    let broken = &registry.publishers()[0];
    assert!(broken.article.is_empty());
    assert!(broken.video.is_empty());

    let good = &registry.publishers()[1];
    assert_eq!(good.article, vec!["https://good.example/nota/1"]);
    assert_eq!(good.video, vec!["https://good.example/video/2"]);
}

#[tokio::test]
async fn test_split_publisher_sources_fail_independently() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/news.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&["https://tv.example/nota".to_string()])),
        )
        .mount(&server)
        .await;

    let entry = PublisherEntry {
        name: "Azteca 7".to_string(),
        adapter: AdapterSpec::Split {
            article: source(format!("{}/news.xml", base)),
            video: source(format!("{}/missing.xml", base)),
        },
    };

    let urls = Harvester::new(fetcher(2)).harvest_publisher(&entry).await;
    assert_eq!(urls.name, "Azteca 7");
    assert_eq!(urls.article, vec!["https://tv.example/nota"]);
    assert!(urls.video.is_empty());
}

#[tokio::test]
async fn test_gallery_source_partitions_by_images() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image-sitemap-latest.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url><loc>https://tv.example/foto</loc>
    <image:image><image:loc>https://cdn.tv.example/1.jpg</image:loc></image:image>
  </url>
  <url><loc>https://tv.example/galeria</loc>
    <image:image><image:loc>https://cdn.tv.example/2.jpg</image:loc></image:image>
    <image:image><image:loc>https://cdn.tv.example/3.jpg</image:loc></image:image>
  </url>
</urlset>"#,
        ))
        .mount(&server)
        .await;

    let entry = GalleryEntry {
        name: "img.Azteca7".to_string(),
        url: format!("{}/image-sitemap-latest.xml", server.uri()),
        min_images: 2,
    };

    let urls = Harvester::new(fetcher(1)).harvest_gallery(&entry).await;
    assert_eq!(urls.gallery, vec!["https://tv.example/galeria"]);
    assert_eq!(urls.plain, vec!["https://tv.example/foto"]);
}
