//! HTTP fetcher implementation
//!
//! This module handles all page requests for the worker, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::url::CrawlUrl;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Expected HTML, got {content_type}")]
    ContentMismatch { content_type: String },

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Returns true if another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) => true,
            Self::Status { status } => *status >= 500,
            _ => false,
        }
    }

    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Retrieves raw page text for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning its body as text
    async fn fetch(&self, url: &CrawlUrl) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `config` - Timeouts for page requests
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use crawl_worker::config::{FetcherConfig, UserAgentConfig};
/// use crawl_worker::crawler::build_http_client;
///
/// let client =
///     build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    config: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by `reqwest`
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx, HTML | Return body |
/// | HTTP 4xx | Immediate failure |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout | Retry up to `max_retries` times |
/// | Connection refused / DNS | Retry up to `max_retries` times |
/// | Non-HTML Content-Type | Immediate failure |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(
        user_agent: &UserAgentConfig,
        config: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    async fn fetch_once(&self, url: &CrawlUrl) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        // Check Content-Type; a missing header is accepted
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::ContentMismatch {
                    content_type: content_type.to_string(),
                });
            }
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &CrawlUrl) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Fetch of {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        attempt,
                        self.max_retries,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
