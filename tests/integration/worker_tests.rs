use crawl_worker::config::{Config, FetcherConfig, MothershipConfig, WorkerConfig};
use crawl_worker::{
    CrawlUrl, DispatchError, Extractor, FetchError, UserPageExtractor, Worker, WorkerError,
    WorkerState,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("../fixtures/sample_user_page.html");

/// Creates a test configuration delivering to `endpoint`
fn create_test_config(endpoint: &str, max_links: usize) -> Config {
    Config {
        worker: WorkerConfig {
            max_links,
            fetch_concurrency: 1,
        },
        fetcher: FetcherConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            max_retries: 2,
            retry_delay_ms: 10, // Very short for testing
        },
        mothership: MothershipConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
        },
        ..Config::default()
    }
}

/// Returns a URL on a port with nothing listening
fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/records", port)
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

fn record_row(title: &str) -> String {
    format!(
        r#"<div class="thing"><a class="title" href="/r/rust/comments/{0}">{0}</a>
        <a class="subreddit" href="/r/rust/">r/rust</a></div>"#,
        title
    )
}

/// Parses every batch the mothership received
async fn received_batches(mothership: &MockServer) -> Vec<serde_json::Value> {
    mothership
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

#[test]
fn test_fixture_parses_into_triplets() {
    let extractor = UserPageExtractor::new(&Default::default()).unwrap();
    let page_url = CrawlUrl::parse("https://www.reddit.com/user/Chrikelnel").unwrap();

    let outcome = extractor.parse(FIXTURE, &page_url);

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.dropped_rows, 1);

    let first = &outcome.records[0];
    assert_eq!(first.label, "Borrow checker question");
    assert_eq!(first.value, "r/rust");
    assert_eq!(
        first.metadata,
        "https://www.reddit.com/r/rust/comments/5dx0x1/borrow_checker_question/"
    );
    // Text split across lines is collapsed
    assert_eq!(outcome.records[1].label, "Async IO in practice");

    assert_eq!(
        outcome.next_page.as_ref().map(CrawlUrl::as_str),
        Some("https://www.reddit.com/user/Chrikelnel/?count=25&after=t3_5dv1z3")
    );
    assert_eq!(outcome.links.len(), 3);
    assert_eq!(outcome.rejected_links, 1);
}

#[test]
fn test_fixture_with_crlf_line_endings() {
    let extractor = UserPageExtractor::new(&Default::default()).unwrap();
    let page_url = CrawlUrl::parse("https://www.reddit.com/user/Chrikelnel").unwrap();
    let crlf = FIXTURE.replace('\n', "\r\n");

    let outcome = extractor.parse(&crlf, &page_url);
    assert_eq!(outcome.records, extractor.parse(FIXTURE, &page_url).records);
}

#[tokio::test]
async fn test_full_crawl_delivers_every_page() {
    let site = MockServer::start().await;
    let mothership = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .respond_with(html(format!(
            r#"<html><body>{}{}
            <a class="author" href="/user/bob">bob</a>
            <span class="next-button"><a href="/user/alice/page/2">next</a></span>
            </body></html>"#,
            record_row("first"),
            record_row("second")
        )))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/alice/page/2"))
        .respond_with(html(format!(
            r#"<html><body>{}<a class="author" href="/user/alice">alice</a></body></html>"#,
            record_row("third")
        )))
        .expect(1)
        .mount(&site)
        .await;

    // Bob's page has no records and is not dispatched
    Mock::given(method("GET"))
        .and(path("/user/bob"))
        .respond_with(html("<html><body><p>nothing here</p></body></html>"))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("POST"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mothership)
        .await;

    let config = create_test_config(&format!("{}/records", mothership.uri()), 100);
    let mut worker = Worker::from_config(format!("{}/user/alice", site.uri()), &config).unwrap();

    let report = worker.run().await.unwrap();

    assert_eq!(worker.state(), WorkerState::Succeeded);
    assert_eq!(report.pages_crawled, 3);
    assert_eq!(report.records_dispatched, 3);
    assert_eq!(report.batches_dispatched, 2);

    let batches = received_batches(&mothership).await;
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["records"].as_array().unwrap().len(), 2);
    assert_eq!(batches[0]["records"][0]["label"], "first");
    assert_eq!(batches[0]["records"][0]["value"], "r/rust");
    assert_eq!(
        batches[0]["records"][0]["metadata"],
        format!("{}/r/rust/comments/first", site.uri())
    );
    assert_eq!(batches[1]["records"][0]["label"], "third");
}

#[tokio::test]
async fn test_unreachable_mothership_is_dispatch_failure() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/Chrikelnel"))
        .respond_with(html(FIXTURE))
        .expect(1)
        .mount(&site)
        .await;

    // Seed only, so the fixture's absolute links are never followed
    let config = create_test_config(&unreachable_endpoint(), 0);
    let mut worker =
        Worker::from_config(format!("{}/user/Chrikelnel", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();

    assert!(err.is_dispatch_failure());
    assert!(!err.is_fetch_failure());
    assert!(matches!(
        err,
        WorkerError::Dispatch(DispatchError::ConnectionRefused { .. })
    ));
    assert_eq!(worker.report().pages_crawled, 1);
    assert_eq!(worker.state(), WorkerState::Failed);
}

#[tokio::test]
async fn test_improper_seed_makes_no_requests() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(FIXTURE))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&unreachable_endpoint(), 10);
    let mut worker =
        Worker::from_config(format!("{} /user/Chrikelnel", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();

    assert!(err.is_invalid_url());
    assert!(!err.is_fetch_failure());
    assert!(!err.is_dispatch_failure());
    assert_eq!(worker.state(), WorkerState::Failed);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    let config = create_test_config(&unreachable_endpoint(), 10);
    let mut worker = Worker::from_config(format!("{}/user/gone", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();

    assert!(err.is_fetch_failure());
    match err {
        WorkerError::Fetch { url, source } => {
            assert_eq!(url, format!("{}/user/gone", site.uri()));
            assert!(matches!(source, FetchError::Status { status: 404 }));
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_retried_then_fails() {
    let site = MockServer::start().await;

    // One attempt plus two retries
    Mock::given(method("GET"))
        .and(path("/user/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&site)
        .await;

    let config = create_test_config(&unreachable_endpoint(), 10);
    let mut worker = Worker::from_config(format!("{}/user/flaky", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();
    assert!(matches!(
        err,
        WorkerError::Fetch {
            source: FetchError::Status { status: 503 },
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_html_response_is_content_mismatch() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&site)
        .await;

    let config = create_test_config(&unreachable_endpoint(), 10);
    let mut worker = Worker::from_config(format!("{}/user/alice", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();
    assert!(matches!(
        err,
        WorkerError::Fetch {
            source: FetchError::ContentMismatch { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_mothership_rejection_stops_crawl() {
    let site = MockServer::start().await;
    let mothership = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .respond_with(html(format!(
            r#"<html><body>{}<a class="author" href="/user/bob">bob</a></body></html>"#,
            record_row("only")
        )))
        .expect(1)
        .mount(&site)
        .await;

    // Never reached: the dispatch failure ends the session first
    Mock::given(method("GET"))
        .and(path("/user/bob"))
        .respond_with(html(record_row("bob")))
        .expect(0)
        .mount(&site)
        .await;

    Mock::given(method("POST"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mothership)
        .await;

    let config = create_test_config(&format!("{}/records", mothership.uri()), 10);
    let mut worker = Worker::from_config(format!("{}/user/alice", site.uri()), &config).unwrap();

    let err = worker.run().await.unwrap_err();
    assert!(matches!(
        err,
        WorkerError::Dispatch(DispatchError::Rejected { status: 500 })
    ));
}

#[tokio::test]
async fn test_concurrent_session_fetches_each_page_once() {
    let site = MockServer::start().await;
    let mothership = MockServer::start().await;

    let authors: String = (0..8)
        .map(|i| format!(r#"<a class="author" href="/user/u{}">u{}</a>"#, i, i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .respond_with(html(format!(
            "<html><body>{}{}</body></html>",
            record_row("seed"),
            authors
        )))
        .expect(1)
        .mount(&site)
        .await;

    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/user/u{}", i)))
            .respond_with(html(format!(
                r#"<html><body>{}{}<a class="author" href="/user/alice">alice</a></body></html>"#,
                record_row(&format!("post{}", i)),
                authors
            )))
            .expect(1)
            .mount(&site)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200))
        .expect(9)
        .mount(&mothership)
        .await;

    let mut config = create_test_config(&format!("{}/records", mothership.uri()), 100);
    config.worker.fetch_concurrency = 4;
    let mut worker = Worker::from_config(format!("{}/user/alice", site.uri()), &config).unwrap();

    let report = worker.run().await.unwrap();
    assert_eq!(report.pages_crawled, 9);
    assert_eq!(report.records_dispatched, 9);
}
