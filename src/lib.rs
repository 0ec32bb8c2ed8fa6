//! Crawl-Worker: a single-target user-page crawl worker
//!
//! This crate fetches a seed profile page, extracts fixed-shape records and
//! pagination links, expands a capped and deduplicated frontier, and forwards
//! parsed records to a remote collector (the "mothership").

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

pub use crawler::FetchError;
pub use output::DispatchError;

/// Main error type for a worker session
///
/// Fetch and dispatch failures are separate variants so callers can tell
/// "the crawl itself failed" from "the crawl worked but delivery didn't".
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Dispatch to mothership failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Fetch task aborted: {0}")]
    TaskAborted(String),
}

impl WorkerError {
    /// Returns true if the session failed while retrieving a page
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::TaskAborted(_))
    }

    /// Returns true if the crawl succeeded but records could not be delivered
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }

    /// Returns true if the seed (or another URL) failed validation
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidUrl(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {field}: {message}")]
    InvalidSelector { field: String, message: String },
}

/// URL validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("URL contains whitespace: '{0}'")]
    Whitespace(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: '{0}'")]
    MissingHost(String),
}

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    CrawlReport, Extractor, Fetcher, Frontier, FrontierEmpty, ParseOutcome, Record,
    UserPageExtractor, Worker,
};
pub use output::{Dispatcher, MothershipClient};
pub use state::WorkerState;
pub use url::CrawlUrl;
