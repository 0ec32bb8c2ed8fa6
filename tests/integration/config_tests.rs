use crawl_worker::config::{load_config, load_config_with_hash};
use crawl_worker::{ConfigError, Worker};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file_and_build_worker() {
    let file = write_config(
        r#"
[worker]
max-links = 25
fetch-concurrency = 2

[mothership]
endpoint = "http://127.0.0.1:9000/ingest"

[extractor]
row-selector = "article.post"
label = { selector = "h2" }
"#,
    );

    let (config, hash) = load_config_with_hash(file.path()).unwrap();

    assert_eq!(config.worker.max_links, 25);
    assert_eq!(config.worker.fetch_concurrency, 2);
    assert_eq!(config.mothership.endpoint, "http://127.0.0.1:9000/ingest");
    assert_eq!(config.extractor.row_selector, "article.post");
    assert_eq!(config.extractor.label.selector, "h2");
    assert_eq!(config.extractor.value.selector, "a.subreddit");
    assert_eq!(hash.len(), 64);

    let worker = Worker::from_config("https://example.com/user/alice", &config).unwrap();
    assert_eq!(worker.max_links(), 25);
}

#[test]
fn test_invalid_selector_in_file_is_rejected() {
    let file = write_config(
        r#"
[extractor]
links-selector = "a[["
"#,
    );

    let result = load_config(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidSelector { .. })));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
