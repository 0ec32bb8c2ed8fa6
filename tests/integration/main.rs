//! Integration tests for the crawl worker
//!
//! These tests use wiremock to stand in for both the crawled site and the
//! mothership, and exercise full sessions end-to-end.

mod config_tests;
mod worker_tests;
