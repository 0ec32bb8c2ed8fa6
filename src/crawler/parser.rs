//! HTML extractor for user profile pages
//!
//! This module turns page markup into:
//! - Records (one per data row, always three fields)
//! - The next-page URL, if a pagination control is present
//! - Further links to crawl
//!
//! All three outputs come from a single parse of the document.

use crate::config::{parse_selector, ExtractorConfig, FieldSelector};
use crate::url::{resolve_link, CrawlUrl};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// One parsed result unit
///
/// For the default user-page selectors: `label` is the post title, `value` the
/// community it was posted to, and `metadata` its permalink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    pub label: String,
    pub value: String,
    pub metadata: String,
}

impl Record {
    /// Creates a record from its three fields
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        metadata: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            metadata: metadata.into(),
        }
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Complete rows, in document order
    pub records: Vec<Record>,

    /// Target of the pagination control
    pub next_page: Option<CrawlUrl>,

    /// Other links worth crawling, in document order
    pub links: Vec<CrawlUrl>,

    /// Rows skipped because a field was missing or empty
    pub dropped_rows: usize,

    /// Candidate links that did not resolve to a valid URL
    pub rejected_links: usize,
}

/// Parses page text into records and links
///
/// Implementations must be pure: the same input always yields the same
/// outcome and nothing outside the return value is touched.
pub trait Extractor: Send + Sync {
    /// Parses `page_text`, resolving relative links against `page_url`
    fn parse(&self, page_text: &str, page_url: &CrawlUrl) -> ParseOutcome;
}

/// A compiled field selector
#[derive(Debug, Clone)]
struct FieldRule {
    selector: Selector,
    attribute: Option<String>,
}

impl FieldRule {
    fn compile(field: &str, config: &FieldSelector) -> Result<Self, ConfigError> {
        Ok(Self {
            selector: parse_selector(field, &config.selector)?,
            attribute: config.attribute.clone(),
        })
    }

    /// Reads this field from a row, or None if absent or blank
    fn extract(&self, row: &ElementRef<'_>, page_url: &CrawlUrl) -> Option<String> {
        let element = row.select(&self.selector).next()?;

        let value = match &self.attribute {
            Some(attribute) => {
                let raw = element.value().attr(attribute)?.trim();
                if attribute == "href" {
                    resolve_link(raw, page_url)
                        .map(|url| url.to_string())
                        .unwrap_or_else(|| raw.to_string())
                } else {
                    raw.to_string()
                }
            }
            None => collapse_whitespace(element.text()),
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Selector-driven extractor for user profile listings
#[derive(Debug, Clone)]
pub struct UserPageExtractor {
    row: Selector,
    next_page: Selector,
    links: Selector,
    label: FieldRule,
    value: FieldRule,
    metadata: FieldRule,
}

impl UserPageExtractor {
    /// Compiles the selectors in `config`
    ///
    /// # Returns
    ///
    /// * `Ok(UserPageExtractor)` - All selectors compiled
    /// * `Err(ConfigError)` - A selector failed to parse
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            row: parse_selector("row-selector", &config.row_selector)?,
            next_page: parse_selector("next-page-selector", &config.next_page_selector)?,
            links: parse_selector("links-selector", &config.links_selector)?,
            label: FieldRule::compile("label", &config.label)?,
            value: FieldRule::compile("value", &config.value)?,
            metadata: FieldRule::compile("metadata", &config.metadata)?,
        })
    }

    fn extract_records(&self, document: &Html, page_url: &CrawlUrl) -> (Vec<Record>, usize) {
        let mut records = Vec::new();
        let mut dropped = 0;

        for row in document.select(&self.row) {
            let fields = (
                self.label.extract(&row, page_url),
                self.value.extract(&row, page_url),
                self.metadata.extract(&row, page_url),
            );

            match fields {
                (Some(label), Some(value), Some(metadata)) => records.push(Record {
                    label,
                    value,
                    metadata,
                }),
                _ => dropped += 1,
            }
        }

        (records, dropped)
    }

    fn extract_next_page(&self, document: &Html, page_url: &CrawlUrl) -> Option<CrawlUrl> {
        document
            .select(&self.next_page)
            .filter_map(|element| element.value().attr("href"))
            .find_map(|href| resolve_link(href, page_url))
    }

    fn extract_links(&self, document: &Html, page_url: &CrawlUrl) -> (Vec<CrawlUrl>, usize) {
        let mut links = Vec::new();
        let mut rejected = 0;

        for element in document.select(&self.links) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match resolve_link(href, page_url) {
                Some(url) => links.push(url),
                None => {
                    tracing::debug!("Rejected discovered link {:?} on {}", href, page_url);
                    rejected += 1;
                }
            }
        }

        (links, rejected)
    }
}

impl Extractor for UserPageExtractor {
    fn parse(&self, page_text: &str, page_url: &CrawlUrl) -> ParseOutcome {
        let normalized = normalize_page_text(page_text);
        let document = Html::parse_document(&normalized);

        let (records, dropped_rows) = self.extract_records(&document, page_url);
        let next_page = self.extract_next_page(&document, page_url);
        let (links, rejected_links) = self.extract_links(&document, page_url);

        tracing::debug!(
            "Parsed {}: {} records ({} dropped), {} links, next page: {}",
            page_url,
            records.len(),
            dropped_rows,
            links.len(),
            next_page.as_ref().map(CrawlUrl::as_str).unwrap_or("none")
        );

        ParseOutcome {
            records,
            next_page,
            links,
            dropped_rows,
            rejected_links,
        }
    }
}

/// Trims the page and unifies CR/LF line endings
fn normalize_page_text(page_text: &str) -> String {
    page_text.trim().replace("\r\n", "\n").replace('\r', "\n")
}

/// Joins text nodes, collapsing runs of whitespace into single spaces
fn collapse_whitespace<'a>(text: impl Iterator<Item = &'a str>) -> String {
    text.flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
