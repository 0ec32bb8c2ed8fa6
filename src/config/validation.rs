use crate::config::types::{
    Config, ExtractorConfig, FetcherConfig, FieldSelector, MothershipConfig, UserAgentConfig,
    WorkerConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on concurrent fetches for one worker
const MAX_FETCH_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_worker_config(&config.worker)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_mothership_config(&config.mothership)?;
    validate_extractor_config(&config.extractor)?;
    Ok(())
}

/// Validates worker configuration
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    // max_links = 0 is allowed: the worker then crawls the seed only

    if config.fetch_concurrency < 1 || config.fetch_concurrency > MAX_FETCH_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "fetch_concurrency must be between 1 and {}, got {}",
            MAX_FETCH_CONCURRENCY, config.fetch_concurrency
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates fetcher timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetcher timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetcher connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the mothership endpoint
fn validate_mothership_config(config: &MothershipConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid mothership endpoint '{}': {}",
            config.endpoint, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Mothership endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "mothership timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates that every extractor selector parses
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    validate_selector("row-selector", &config.row_selector)?;
    validate_selector("next-page-selector", &config.next_page_selector)?;
    validate_selector("links-selector", &config.links_selector)?;
    validate_field("label", &config.label)?;
    validate_field("value", &config.value)?;
    validate_field("metadata", &config.metadata)?;
    Ok(())
}

fn validate_field(field: &str, selector: &FieldSelector) -> Result<(), ConfigError> {
    validate_selector(field, &selector.selector)?;

    if let Some(attribute) = &selector.attribute {
        if attribute.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "attribute for {} cannot be empty",
                field
            )));
        }
    }

    Ok(())
}

/// Parses a CSS selector, reporting which field it belongs to on failure
pub(crate) fn parse_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector {
            field: field.to_string(),
            message: "selector cannot be empty".to_string(),
        });
    }

    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: format!("{:?}", e),
    })
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    parse_selector(field, selector).map(|_| ())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
