use crate::url::CrawlUrl;

/// Resolves a link href to an absolute, validated URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - hrefs with whitespace inside them (surrounding whitespace is trimmed)
/// - anything that does not resolve to a valid `CrawlUrl`
///
/// # Examples
///
/// ```
/// use crawl_worker::url::{resolve_link, CrawlUrl};
///
/// let base = CrawlUrl::parse("https://example.com/user/alice").unwrap();
/// let link = resolve_link("/user/bob", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/user/bob");
///
/// assert!(resolve_link("javascript:void(0)", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base_url: &CrawlUrl) -> Option<CrawlUrl> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Dropping unresolvable link {}: {}", href, e);
            None
        }
    }
}
