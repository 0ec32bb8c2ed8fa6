use serde::Deserialize;

/// Default capacity of the pending portion of the frontier
pub const DEFAULT_MAX_LINKS: usize = 1000;

/// Main configuration structure for Crawl-Worker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub worker: WorkerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetcher: FetcherConfig,
    pub mothership: MothershipConfig,
    pub extractor: ExtractorConfig,
}

/// Crawl session behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Capacity ceiling on URLs waiting in the frontier
    #[serde(rename = "max-links")]
    pub max_links: usize,

    /// Number of page fetches allowed in flight at once
    #[serde(rename = "fetch-concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_links: DEFAULT_MAX_LINKS,
            fetch_concurrency: 1,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CrawlWorker".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Extra attempts for transient failures (timeouts, connect errors, 5xx)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

/// Remote collector configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MothershipConfig {
    /// Endpoint that accepts `POST`ed record batches
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for MothershipConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/records".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Selects one record field inside a row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSelector {
    /// CSS selector, matched against the row's descendants
    pub selector: String,

    /// Attribute to read; the element's text content is used when absent
    #[serde(default)]
    pub attribute: Option<String>,
}

impl FieldSelector {
    /// Selects the text content of the first match
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attribute: None,
        }
    }

    /// Selects an attribute of the first match
    pub fn attr(selector: &str, attribute: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }
}

/// Page structure contract for the source site
///
/// The defaults describe a user profile listing where every submitted post is
/// a `div.thing` row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Selector matching one data row per record
    #[serde(rename = "row-selector")]
    pub row_selector: String,

    /// Selector for the pagination control; its `href` is the next page
    #[serde(rename = "next-page-selector")]
    pub next_page_selector: String,

    /// Selector for further links to crawl; each `href` is a candidate
    #[serde(rename = "links-selector")]
    pub links_selector: String,

    pub label: FieldSelector,
    pub value: FieldSelector,
    pub metadata: FieldSelector,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            row_selector: "div.thing".to_string(),
            next_page_selector: "span.next-button a[href]".to_string(),
            links_selector: "a.author[href]".to_string(),
            label: FieldSelector::text("a.title"),
            value: FieldSelector::text("a.subreddit"),
            metadata: FieldSelector::attr("a.title", "href"),
        }
    }
}
