//! URL handling module for Crawl-Worker
//!
//! This module provides the validated `CrawlUrl` type that every frontier
//! entry must be, and resolution of raw `href` values found on pages.

mod crawl_url;
mod resolve;

// Re-export main types and functions
pub use crawl_url::CrawlUrl;
pub use resolve::resolve_link;
