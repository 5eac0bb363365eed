//! Integration tests for the crawl engine
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full fetch/extract/admit cycle end-to-end.

use gatewalk::config::Config;
use gatewalk::crawler::{crawl, CrawlState, Crawler};
use gatewalk::rules::Pattern;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a config crawling the given seed with no extra rules
fn config_for(seed: &str) -> Config {
    let mut config = Config::default();
    config.seeds = vec![seed.to_string()];
    config
}

/// Restricts the host rule to the mock server's loopback host
fn restrict_to_loopback(config: &mut Config) {
    config.rules.host.accept = vec![r"^127\.0\.0\.1$".to_string()];
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string().into_bytes(), "text/html")
}

#[tokio::test]
async fn test_full_crawl_visits_every_linked_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/page1">Page 1</a>
            <a href="{base}/page2">Page 2</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page("<html><body>One</body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page("<html><body>Two</body></html>"))
        .mount(&mock_server)
        .await;

    let snapshot = crawl(&config_for(&format!("{base}/"))).await.unwrap();

    assert_eq!(
        snapshot.history,
        vec![
            format!("{base}/"),
            format!("{base}/page1"),
            format!("{base}/page2")
        ]
    );
    assert!(snapshot.queue.is_empty());
    assert!(snapshot.failures.is_empty());
}

#[tokio::test]
async fn test_host_rule_keeps_crawl_on_site() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // The foreign link must never be admitted, let alone resolved
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/local">Local</a>
            <a href="http://elsewhere.invalid/remote">Remote</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/local"))
        .respond_with(html_page("<html><body>Local</body></html>"))
        .mount(&mock_server)
        .await;

    let mut config = config_for(&format!("{base}/"));
    restrict_to_loopback(&mut config);

    let snapshot = crawl(&config).await.unwrap();

    assert_eq!(
        snapshot.history,
        vec![format!("{base}/"), format!("{base}/local")]
    );
    assert!(snapshot.failures.is_empty());
    assert!(!snapshot
        .history
        .iter()
        .any(|url| url.contains("elsewhere.invalid")));
}

#[tokio::test]
async fn test_http_error_recorded_as_failure_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/down">Down</a>
            <a href="{base}/up">Up</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(html_page("<html><body>Up</body></html>"))
        .mount(&mock_server)
        .await;

    let snapshot = crawl(&config_for(&format!("{base}/"))).await.unwrap();

    assert_eq!(snapshot.failures, vec![format!("{base}/down")]);
    assert_eq!(
        snapshot.history,
        vec![format!("{base}/"), format!("{base}/up")]
    );
    assert!(snapshot.queue.is_empty());
}

#[tokio::test]
async fn test_extension_rule_prevents_fetch() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/doc.pdf">PDF</a>
            <a href="{base}/page.html">Page</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page.html"))
        .respond_with(html_page("<html><body>Page</body></html>"))
        .mount(&mock_server)
        .await;

    // The rejected document must never be requested
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&format!("{base}/"));
    config.rules.extension.reject = vec!["^pdf$".to_string()];

    let snapshot = crawl(&config).await.unwrap();

    assert_eq!(
        snapshot.history,
        vec![format!("{base}/"), format!("{base}/page.html")]
    );
    assert!(!snapshot.queue.iter().any(|url| url.ends_with(".pdf")));
}

#[tokio::test]
async fn test_non_html_response_is_visited_without_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body><a href="{base}/data.json">Data</a></body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"see": "http://elsewhere.invalid/"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let snapshot = crawl(&config_for(&format!("{base}/"))).await.unwrap();

    assert_eq!(
        snapshot.history,
        vec![format!("{base}/"), format!("{base}/data.json")]
    );
    assert!(snapshot.queue.is_empty());
    assert!(snapshot.failures.is_empty());
}

#[tokio::test]
async fn test_pause_from_observer_and_resume() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body><a href="{base}/next">Next</a></body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<html><body>Next</body></html>"))
        .mount(&mock_server)
        .await;

    let config = config_for(&format!("{base}/"));
    let mut crawler = Crawler::from_config(&config).unwrap();

    // Pause after the first fetched page; its links must still be admitted
    let handle = crawler.handle();
    crawler.observers_mut().on_page(move |_| handle.pause());

    crawler.start_at(&format!("{base}/")).await.unwrap();

    assert_eq!(crawler.state(), CrawlState::Paused);
    let paused = crawler.snapshot();
    assert_eq!(paused.history, vec![format!("{base}/")]);
    assert_eq!(paused.queue, vec![format!("{base}/next")]);

    // Resuming continues from the next queue entry
    crawler.resume();
    crawler.run().await;

    let finished = crawler.snapshot();
    assert_eq!(
        finished.history,
        vec![format!("{base}/"), format!("{base}/next")]
    );
    assert!(finished.queue.is_empty());
}

#[tokio::test]
async fn test_observers_fire_end_to_end() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/report.pdf">Report</a>
            <a href="{base}/about">About</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("%PDF")
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("<html><body>About</body></html>"))
        .mount(&mock_server)
        .await;

    let config = config_for(&format!("{base}/"));
    let mut crawler = Crawler::from_config(&config).unwrap();

    let admitted = Arc::new(Mutex::new(Vec::new()));
    let pdf_hits = Arc::new(Mutex::new(Vec::new()));
    let page_count = Arc::new(Mutex::new(0usize));

    {
        let admitted = Arc::clone(&admitted);
        crawler
            .observers_mut()
            .on_every_url(move |url| admitted.lock().unwrap().push(url.to_string()));
    }
    {
        let pdf_hits = Arc::clone(&pdf_hits);
        crawler.observers_mut().on_urls_matching(
            Pattern::regex(r"\.pdf$").unwrap(),
            move |url| pdf_hits.lock().unwrap().push(url.to_string()),
        );
    }
    {
        let page_count = Arc::clone(&page_count);
        crawler.observers_mut().on_page(move |_| {
            *page_count.lock().unwrap() += 1;
        });
    }

    crawler.start_at(&format!("{base}/")).await.unwrap();

    assert_eq!(
        *admitted.lock().unwrap(),
        vec![
            format!("{base}/"),
            format!("{base}/report.pdf"),
            format!("{base}/about")
        ]
    );
    assert_eq!(*pdf_hits.lock().unwrap(), vec![format!("{base}/report.pdf")]);
    assert_eq!(*page_count.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_session_reused_per_destination() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{base}/a">A</a>
            <a href="{base}/b">B</a>
            </body></html>"#
        )))
        .mount(&mock_server)
        .await;

    for p in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_page("<html><body>x</body></html>"))
            .mount(&mock_server)
            .await;
    }

    let config = config_for(&format!("{base}/"));
    let mut crawler = Crawler::from_config(&config).unwrap();
    crawler.start_at(&format!("{base}/")).await.unwrap();

    assert_eq!(crawler.snapshot().history.len(), 3);
    // Three fetches, one destination, one session
    assert_eq!(crawler.fetcher().session_count(), 1);
}
