//! Worker - crawl session orchestration
//!
//! This module contains the main crawl loop that coordinates one session:
//! - Validating the seed and creating the frontier
//! - Fetching pages (one at a time, or a bounded number in flight)
//! - Parsing pages and expanding the frontier
//! - Delivering each page's records to the dispatcher

use crate::config::{Config, DEFAULT_MAX_LINKS};
use crate::crawler::fetcher::{FetchError, Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{Extractor, UserPageExtractor};
use crate::output::{Dispatcher, MothershipClient};
use crate::state::WorkerState;
use crate::url::CrawlUrl;
use crate::WorkerError;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Counters for one crawl session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched and parsed
    pub pages_crawled: usize,

    /// Records acknowledged by the dispatcher
    pub records_dispatched: usize,

    /// Non-empty batches acknowledged by the dispatcher
    pub batches_dispatched: usize,

    /// URLs accepted into the frontier, excluding the seed
    pub links_queued: usize,

    /// Rows skipped for not having all three fields
    pub rows_dropped: usize,

    /// Discovered links that failed validation
    pub links_rejected: usize,
}

/// Crawl worker for a single seed URL
///
/// The worker owns its collaborators and creates a fresh frontier on every
/// `run`. `run` takes `&mut self`, so one instance cannot run two sessions at
/// once; parallel crawling uses separate workers.
pub struct Worker {
    seed: String,
    max_links: usize,
    fetch_concurrency: usize,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    dispatcher: Arc<dyn Dispatcher>,
    state: WorkerState,
    report: CrawlReport,
}

impl Worker {
    /// Creates a new worker
    ///
    /// The seed is not validated here; `run` is the single validation point.
    ///
    /// # Arguments
    ///
    /// * `seed` - URL of the profile page to start from
    /// * `fetcher` - Retrieves page text
    /// * `extractor` - Parses page text into records and links
    /// * `dispatcher` - Receives each page's records
    pub fn new(
        seed: impl Into<String>,
        fetcher: impl Fetcher + 'static,
        extractor: impl Extractor + 'static,
        dispatcher: impl Dispatcher + 'static,
    ) -> Self {
        Self {
            seed: seed.into(),
            max_links: DEFAULT_MAX_LINKS,
            fetch_concurrency: 1,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            dispatcher: Arc::new(dispatcher),
            state: WorkerState::Idle,
            report: CrawlReport::default(),
        }
    }

    /// Creates a worker with the HTTP fetcher, selector extractor, and
    /// mothership client described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Worker)` - Successfully created worker
    /// * `Err(WorkerError)` - A client could not be built or a selector is invalid
    pub fn from_config(seed: impl Into<String>, config: &Config) -> Result<Self, WorkerError> {
        let fetcher = HttpFetcher::new(&config.user_agent, &config.fetcher)?;
        let extractor = UserPageExtractor::new(&config.extractor)?;
        let dispatcher = MothershipClient::new(&config.user_agent, &config.mothership)?;

        Ok(Self::new(seed, fetcher, extractor, dispatcher)
            .with_max_links(config.worker.max_links)
            .with_fetch_concurrency(config.worker.fetch_concurrency))
    }

    /// Sets the frontier capacity used by subsequent runs
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    /// Sets how many fetches may be in flight at once (minimum 1)
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    /// Returns the seed as given
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Returns the frontier capacity
    pub fn max_links(&self) -> usize {
        self.max_links
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Returns the counters of the current or most recent session
    ///
    /// After a failed run this shows how far the session got, including
    /// batches already delivered.
    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Runs one crawl session
    ///
    /// # Loop
    ///
    /// 1. Pop the next URL (an empty frontier ends the session)
    /// 2. Fetch it; failure aborts with `WorkerError::Fetch`
    /// 3. Mark it crawled
    /// 4. Parse it
    /// 5. Queue the next-page URL and discovered links
    /// 6. Dispatch its records; failure aborts with `WorkerError::Dispatch`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The frontier drained and every batch was delivered
    /// * `Err(WorkerError)` - Invalid seed, fetch failure, or dispatch failure
    pub async fn run(&mut self) -> Result<CrawlReport, WorkerError> {
        if self.state.is_terminal() {
            tracing::debug!("Starting a new session after previous run {}", self.state);
        }
        self.transition(WorkerState::Running);
        self.report = CrawlReport::default();

        let start_time = Instant::now();
        let result = self.crawl().await;

        match &result {
            Ok(report) => {
                self.transition(WorkerState::Succeeded);
                tracing::info!(
                    "Crawl completed: {} pages, {} records delivered in {:?}",
                    report.pages_crawled,
                    report.records_dispatched,
                    start_time.elapsed()
                );
            }
            Err(e) => {
                self.transition(WorkerState::Failed);
                tracing::error!(
                    "Crawl failed after {} pages: {}",
                    self.report.pages_crawled,
                    e
                );
            }
        }

        result
    }

    async fn crawl(&mut self) -> Result<CrawlReport, WorkerError> {
        let seed = CrawlUrl::parse(&self.seed)?;
        tracing::info!(
            "Starting crawl from {} (max links: {}, fetch concurrency: {})",
            seed,
            self.max_links,
            self.fetch_concurrency
        );

        let mut frontier = Frontier::seeded(seed, self.max_links);
        let mut in_flight: JoinSet<(CrawlUrl, Result<String, FetchError>)> = JoinSet::new();

        loop {
            while in_flight.len() < self.fetch_concurrency {
                let Ok(url) = frontier.next() else {
                    break;
                };

                tracing::debug!("Fetching {}", url);
                let fetcher = Arc::clone(&self.fetcher);
                in_flight.spawn(async move {
                    let result = fetcher.fetch(&url).await;
                    (url, result)
                });
            }

            // Nothing pending and nothing in flight
            let Some(joined) = in_flight.join_next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let (url, fetched) = joined.map_err(|e| WorkerError::TaskAborted(e.to_string()))?;
            let body = fetched.map_err(|source| WorkerError::Fetch {
                url: url.to_string(),
                source,
            })?;

            self.process_page(&mut frontier, url, &body).await?;

            if self.report.pages_crawled % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {} records delivered",
                    self.report.pages_crawled,
                    frontier.len(),
                    self.report.records_dispatched
                );
            }
        }

        Ok(self.report.clone())
    }

    /// Handles one fetched page: mark, parse, expand, dispatch
    async fn process_page(
        &mut self,
        frontier: &mut Frontier,
        url: CrawlUrl,
        body: &str,
    ) -> Result<(), WorkerError> {
        frontier.mark_crawled(&url);
        self.report.pages_crawled += 1;

        let outcome = self.extractor.parse(body, &url);
        self.report.rows_dropped += outcome.dropped_rows;
        self.report.links_rejected += outcome.rejected_links;

        let queued = frontier.add_links(outcome.next_page.into_iter().chain(outcome.links));
        self.report.links_queued += queued;

        if outcome.records.is_empty() {
            tracing::debug!("No records on {}", url);
            return Ok(());
        }

        self.dispatcher.send(&outcome.records).await?;
        self.report.records_dispatched += outcome.records.len();
        self.report.batches_dispatched += 1;

        tracing::debug!(
            "Processed {}: {} records, {} new links",
            url,
            outcome.records.len(),
            queued
        );

        Ok(())
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid worker transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("Worker state {} -> {}", self.state, next);
        self.state = next;
    }
}
