//! Crawler module for one crawl session
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Record, next-page, and link extraction
//! - The capped, deduplicated frontier
//! - The worker that drives a session from seed to completion

mod fetcher;
mod frontier;
mod parser;
mod worker;

pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEmpty};
pub use parser::{Extractor, ParseOutcome, Record, UserPageExtractor};
pub use worker::{CrawlReport, Worker};

use crate::config::Config;
use crate::WorkerError;

/// Runs a complete crawl session from `seed`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP fetcher, extractor, and mothership client
/// 2. Validate the seed
/// 3. Fetch and parse pages until the frontier drains
/// 4. Deliver each page's records to the mothership
///
/// # Arguments
///
/// * `seed` - URL of the profile page to start from
/// * `config` - The worker configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and every batch was delivered
/// * `Err(WorkerError)` - Crawl failed
pub async fn crawl(seed: &str, config: &Config) -> Result<CrawlReport, WorkerError> {
    let mut worker = Worker::from_config(seed, config)?;
    worker.run().await
}
