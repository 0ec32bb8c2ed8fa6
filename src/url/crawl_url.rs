use crate::UrlError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A validated absolute URL
///
/// A `CrawlUrl` always has an `http` or `https` scheme, a host, and no
/// whitespace anywhere in its source text. Equality and hashing follow the
/// serialized form produced by the `url` crate; no further canonicalization
/// (trailing slashes, query order) is applied, so callers must pass
/// already-normalized URLs if they want those treated as equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlUrl(Url);

impl CrawlUrl {
    /// Parses and validates a URL
    ///
    /// # Validation Steps
    ///
    /// 1. Reject any whitespace (leading, trailing or embedded)
    /// 2. Parse as an absolute URL; reject if malformed
    /// 3. Require `http` or `https`
    /// 4. Require a non-empty host
    ///
    /// # Examples
    ///
    /// ```
    /// use crawl_worker::url::CrawlUrl;
    ///
    /// let url = CrawlUrl::parse("https://example.com/user/alice").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/user/alice");
    ///
    /// assert!(CrawlUrl::parse("https://example.com /user/alice").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        if input.chars().any(char::is_whitespace) {
            return Err(UrlError::Whitespace(input.to_string()));
        }

        let url = Url::parse(input).map_err(|e| UrlError::Parse {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_url(url)
    }

    /// Validates an already-parsed URL
    pub fn from_url(url: Url) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(url)),
            _ => Err(UrlError::MissingHost(url.to_string())),
        }
    }

    /// Returns the serialized URL
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Resolves `href` against this URL
    ///
    /// `href` is held to the same whitespace rule as [`CrawlUrl::parse`];
    /// `Url::join` would otherwise percent-encode or strip it.
    pub fn join(&self, href: &str) -> Result<Self, UrlError> {
        if href.chars().any(char::is_whitespace) {
            return Err(UrlError::Whitespace(href.to_string()));
        }

        let joined = self.0.join(href).map_err(|e| UrlError::Parse {
            url: href.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(joined)
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for CrawlUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
