//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! searches end-to-end: sitemap, page fetches, classification and report.

use sitemap_sift::config::{Config, CrawlerConfig, OutputConfig};
use sitemap_sift::crawler::{run_search, Coordinator};
use sitemap_sift::matching::{Evidence, Matcher, SearchMode};
use sitemap_sift::output::{format_markdown_report, save_report, PageResult};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the given sitemaps
fn create_test_config(sitemaps: Vec<String>, report_path: &str) -> Config {
    Config {
        sitemaps,
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            request_timeout_secs: 1,
            connect_timeout_secs: 1,
        },
        output: OutputConfig {
            report_path: report_path.to_string(),
        },
        ..Config::default()
    }
}

/// Builds a sitemap document listing the given URLs
fn sitemap_xml(urls: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );
    for url in urls {
        xml.push_str(&format!("  <url><loc>{}</loc></url>\n", url));
    }
    xml.push_str("</urlset>\n");
    xml
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sheet name for a mock server: its host and port
fn sheet_name(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    format!(
        "{}:{}",
        url.host_str().expect("Failed to extract host"),
        url.port().expect("Mock server has an explicit port")
    )
}

#[tokio::test]
async fn test_structural_search_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let page_a = format!("{}/a", base_url);
    let page_b = format!("{}/b", base_url);
    let page_c = format!("{}/c", base_url);

    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[
            page_a.clone(),
            page_b.clone(),
            page_c.clone(),
        ])),
    )
    .await;
    mount_get(
        &server,
        "/a",
        html(r#"<html><body><div class="promo-banner">Sale</div></body></html>"#),
    )
    .await;
    mount_get(
        &server,
        "/b",
        html(r#"<html><body><div class="article">Nothing here</div></body></html>"#),
    )
    .await;
    // C never answers within the 1s request timeout
    mount_get(
        &server,
        "/c",
        html(r#"<div class="promo">late</div>"#).set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], "unused.md");
    let report = run_search(&config, Matcher::from_input(SearchMode::Structural, "promo"))
        .await
        .expect("Search failed");

    assert_eq!(report.sheets.len(), 1);
    let sheet = &report.sheets[0];
    assert_eq!(sheet.name, sheet_name(&server));
    assert_eq!(sheet.rows, vec![PageResult::new(page_a, Evidence::ModuleFound)]);
}

#[tokio::test]
async fn test_textual_search_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let organic = format!("{}/organic", base_url);
    let plain = format!("{}/plain", base_url);

    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[organic.clone(), plain.clone()])),
    )
    .await;
    mount_get(
        &server,
        "/organic",
        html("<html><body><h1>Adult dry food</h1><p>100% Organic ingredients</p></body></html>"),
    )
    .await;
    mount_get(
        &server,
        "/plain",
        html("<html><body><p>Chicken and rice</p></body></html>"),
    )
    .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], "unused.md");
    let report = run_search(
        &config,
        Matcher::from_input(SearchMode::Textual, "organic, grain-free"),
    )
    .await
    .expect("Search failed");

    let sheet = &report.sheets[0];
    assert_eq!(
        sheet.rows,
        vec![PageResult::new(
            organic,
            Evidence::Phrases(vec!["organic".to_string()])
        )]
    );
}

#[tokio::test]
async fn test_empty_sitemap_yields_header_only_section() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[])),
    )
    .await;

    // No page is ever requested
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())], "unused.md");
    let report = run_search(&config, Matcher::from_input(SearchMode::Textual, "anything"))
        .await
        .expect("Search failed");

    assert_eq!(report.sheets.len(), 1);
    assert!(report.sheets[0].is_empty());

    let markdown = format_markdown_report(&report, chrono::Utc::now());
    let section = markdown
        .split(&format!("## {}", sheet_name(&server)))
        .nth(1)
        .expect("Section missing");
    let lines: Vec<&str> = section.trim().lines().collect();
    assert_eq!(lines, vec!["| URL | Result |", "|-----|--------|"]);
}

#[tokio::test]
async fn test_not_found_page_does_not_abort_siblings() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let urls: Vec<String> = ["/missing", "/one", "/two", "/three"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();

    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&urls)),
    )
    .await;
    mount_get(&server, "/missing", ResponseTemplate::new(404)).await;
    for route in ["/one", "/two", "/three"] {
        mount_get(&server, route, html("<p>Grain-Free recipe</p>")).await;
    }

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], "unused.md");
    let report = run_search(&config, Matcher::from_input(SearchMode::Textual, "grain-free"))
        .await
        .expect("Search failed");

    let sheet = &report.sheets[0];
    assert_eq!(sheet.len(), 3);
    assert!(sheet.rows.iter().all(|row| !row.url.ends_with("/missing")));

    let mut matched: Vec<String> = sheet.rows.iter().map(|r| r.url.clone()).collect();
    matched.sort();
    let mut expected = urls[1..].to_vec();
    expected.sort();
    assert_eq!(matched, expected);
}

#[tokio::test]
async fn test_network_error_yields_no_result() {
    let server = MockServer::start().await;
    let reachable = format!("{}/ok", server.uri());
    let unreachable = "http://127.0.0.1:1/refused".to_string();

    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200)
            .set_body_string(sitemap_xml(&[unreachable, reachable.clone()])),
    )
    .await;
    mount_get(&server, "/ok", html(r#"<div class="promo"></div>"#)).await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())], "unused.md");
    let report = run_search(&config, Matcher::from_input(SearchMode::Structural, "promo"))
        .await
        .expect("Search failed");

    assert_eq!(
        report.sheets[0].rows,
        vec![PageResult::new(reachable, Evidence::ModuleFound)]
    );
}

#[tokio::test]
async fn test_failed_sitemap_yields_empty_sheet_and_run_continues() {
    let broken = MockServer::start().await;
    mount_get(&broken, "/sitemap.xml", ResponseTemplate::new(503)).await;

    let healthy = MockServer::start().await;
    let page = format!("{}/page", healthy.uri());
    mount_get(
        &healthy,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[page.clone()])),
    )
    .await;
    mount_get(&healthy, "/page", html("<p>Organic</p>")).await;

    let config = create_test_config(
        vec![
            format!("{}/sitemap.xml", broken.uri()),
            format!("{}/sitemap.xml", healthy.uri()),
        ],
        "unused.md",
    );
    let report = run_search(&config, Matcher::from_input(SearchMode::Textual, "organic"))
        .await
        .expect("Search failed");

    assert_eq!(report.sheets.len(), 2);
    assert_eq!(report.sheets[0].name, sheet_name(&broken));
    assert!(report.sheets[0].is_empty());
    assert_eq!(report.sheets[1].name, sheet_name(&healthy));
    assert_eq!(report.sheets[1].len(), 1);
}

#[tokio::test]
async fn test_sitemaps_are_processed_in_order() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        let page = format!("{}/page", server.uri());
        mount_get(
            server,
            "/sitemap.xml",
            ResponseTemplate::new(200).set_body_string(sitemap_xml(&[page])),
        )
        .await;
        mount_get(server, "/page", html(r#"<div class="Promo-Tile"></div>"#)).await;
    }

    let coordinator = Coordinator::with_client(
        reqwest::Client::new(),
        Matcher::from_input(SearchMode::Structural, "promo"),
        2,
    );
    let report = coordinator
        .run(&[
            format!("{}/sitemap.xml", second.uri()),
            format!("{}/sitemap.xml", first.uri()),
        ])
        .await;

    let names: Vec<&str> = report.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![sheet_name(&second), sheet_name(&first)]);
    assert_eq!(report.total_rows(), 2);
}

#[tokio::test]
async fn test_report_is_written_to_disk() {
    let server = MockServer::start().await;
    let page = format!("{}/page", server.uri());
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[page.clone()])),
    )
    .await;
    mount_get(&server, "/page", html("<p>Organic and grain-free</p>")).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("results.csv");
    let config = create_test_config(
        vec![format!("{}/sitemap.xml", server.uri())],
        &csv_path.display().to_string(),
    );

    let report = run_search(
        &config,
        Matcher::from_input(SearchMode::Textual, "grain-free, organic"),
    )
    .await
    .expect("Search failed");
    save_report(&report, &csv_path).expect("Failed to save report");

    let written = std::fs::read_to_string(&csv_path).expect("Report missing");
    assert_eq!(
        written,
        format!(
            "Sheet,URL,Result\n{},{},\"grain-free, organic\"\n",
            sheet_name(&server),
            page
        )
    );
}

#[tokio::test]
async fn test_failed_pages_log_diagnostics() {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    let missing = format!("{}/missing", server.uri());
    let slow = format!("{}/slow", server.uri());

    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(sitemap_xml(&[missing.clone(), slow.clone()])),
    )
    .await;
    mount_get(&server, "/missing", ResponseTemplate::new(404)).await;
    mount_get(
        &server,
        "/slow",
        html("<p>Organic</p>").set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())], "unused.md");
    let report = run_search(&config, Matcher::from_input(SearchMode::Textual, "organic"))
        .await
        .expect("Search failed");
    assert!(report.sheets[0].is_empty());

    let logs = capture.contents();
    assert!(
        logs.contains(&format!("Non-success status for {}: 404 Not Found", missing)),
        "missing 404 diagnostic in:\n{}",
        logs
    );
    assert!(
        logs.contains(&format!("Failed to retrieve {}: Request timeout", slow)),
        "missing timeout diagnostic in:\n{}",
        logs
    );
    assert!(logs.contains("WARN"));
}
