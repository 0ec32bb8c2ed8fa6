//! Frontier for managing the URLs of one crawl session
//!
//! This module handles:
//! - FIFO ordering of pending URLs (breadth-first traversal)
//! - Deduplication against pending, in-flight, and crawled URLs
//! - A hard cap on the pending queue, enforced by rejecting additions

use crate::url::CrawlUrl;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Returned by [`Frontier::next`] when nothing is pending
///
/// This is the normal end-of-crawl signal, not a user-facing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frontier is empty")]
pub struct FrontierEmpty;

/// Ordered, deduplicated set of URLs pending a visit, plus the visited set
///
/// A URL lives in exactly one of three places: `to_crawl` (pending), the
/// in-flight set (handed out by `next`, not yet marked crawled), or
/// `crawled`. Additions never grow `to_crawl` past `max_links`.
#[derive(Debug, Clone)]
pub struct Frontier {
    /// Pending URLs in insertion order
    to_crawl: VecDeque<CrawlUrl>,

    /// Membership index over `to_crawl`
    queued: HashSet<CrawlUrl>,

    /// URLs returned by `next` whose pages are still being processed
    in_flight: HashSet<CrawlUrl>,

    /// Visited URLs
    crawled: HashSet<CrawlUrl>,

    /// Capacity ceiling on `to_crawl`
    max_links: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given pending-queue capacity
    pub fn new(max_links: usize) -> Self {
        Self {
            to_crawl: VecDeque::new(),
            queued: HashSet::new(),
            in_flight: HashSet::new(),
            crawled: HashSet::new(),
            max_links,
        }
    }

    /// Creates a frontier holding only `seed`
    ///
    /// The seed is placed by construction, not by `add_link`, so it is queued
    /// even when `max_links` is 0.
    pub fn seeded(seed: CrawlUrl, max_links: usize) -> Self {
        let mut frontier = Self::new(max_links);
        frontier.queued.insert(seed.clone());
        frontier.to_crawl.push_back(seed);
        frontier
    }

    /// Adds one URL
    ///
    /// Returns true if the URL was queued, false if it was already known or
    /// the frontier is full.
    pub fn add_link(&mut self, url: CrawlUrl) -> bool {
        if self.is_known(&url) {
            tracing::trace!("Skipping known URL {}", url);
            return false;
        }

        if self.to_crawl.len() >= self.max_links {
            tracing::trace!(
                "Frontier full ({} of {}), dropping {}",
                self.to_crawl.len(),
                self.max_links,
                url
            );
            return false;
        }

        self.queued.insert(url.clone());
        self.to_crawl.push_back(url);
        true
    }

    /// Adds a batch of URLs in order, returning how many were queued
    ///
    /// URLs already pending, in flight, or crawled are skipped. Once the cap
    /// is reached the remaining URLs are dropped without signaling.
    pub fn add_links<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = CrawlUrl>,
    {
        let mut added = 0;
        for url in urls {
            if self.add_link(url) {
                added += 1;
            }
        }
        added
    }

    /// Removes and returns the oldest pending URL
    ///
    /// The URL is tracked as in flight until [`Frontier::mark_crawled`] is
    /// called for it, so it cannot be queued again in the meantime.
    pub fn next(&mut self) -> Result<CrawlUrl, FrontierEmpty> {
        let url = self.to_crawl.pop_front().ok_or(FrontierEmpty)?;
        self.queued.remove(&url);
        self.in_flight.insert(url.clone());
        Ok(url)
    }

    /// Records `url` as visited
    ///
    /// Removes it from the pending queue too, should a caller mark a URL that
    /// was never handed out by `next`.
    pub fn mark_crawled(&mut self, url: &CrawlUrl) {
        self.in_flight.remove(url);
        if self.queued.remove(url) {
            self.to_crawl.retain(|pending| pending != url);
        }
        self.crawled.insert(url.clone());
    }

    /// Changes the capacity for subsequent additions
    ///
    /// Already queued URLs are never evicted, even if the new cap is lower.
    pub fn set_max_links(&mut self, max_links: usize) {
        self.max_links = max_links;
    }

    /// Returns the pending-queue capacity
    pub fn max_links(&self) -> usize {
        self.max_links
    }

    /// Returns the number of pending URLs
    pub fn len(&self) -> usize {
        self.to_crawl.len()
    }

    /// Returns whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.to_crawl.is_empty()
    }

    /// Returns whether the pending queue has reached its cap
    pub fn is_full(&self) -> bool {
        self.to_crawl.len() >= self.max_links
    }

    /// Returns the number of URLs handed out but not yet marked crawled
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the number of visited URLs
    pub fn crawled_count(&self) -> usize {
        self.crawled.len()
    }

    /// Returns whether `url` is pending
    pub fn is_queued(&self, url: &CrawlUrl) -> bool {
        self.queued.contains(url)
    }

    /// Returns whether `url` has been visited
    pub fn is_crawled(&self, url: &CrawlUrl) -> bool {
        self.crawled.contains(url)
    }

    /// Iterates pending URLs in visit order
    pub fn pending(&self) -> impl Iterator<Item = &CrawlUrl> {
        self.to_crawl.iter()
    }

    fn is_known(&self, url: &CrawlUrl) -> bool {
        self.queued.contains(url)
            || self.in_flight.contains(url)
            || self.crawled.contains(url)
    }
}
