use crate::config::types::{Config, CrawlConfig, OutputConfig, SelectorConfig, SiteConfig, TimingConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_webdriver_url(&config.browser.webdriver_url)?;
    validate_timing_config(&config.timing)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.listing_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "listing-path cannot be empty".to_string(),
        ));
    }

    if config.detail_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "detail-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_webdriver_url(webdriver_url: &str) -> Result<(), ConfigError> {
    Url::parse(webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;
    Ok(())
}

/// Validates wait bounds
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if config.mandatory_field_ms == 0 {
        return Err(ConfigError::Validation(
            "mandatory-field-ms must be > 0".to_string(),
        ));
    }

    if config.optional_field_ms == 0 {
        return Err(ConfigError::Validation(
            "optional-field-ms must be > 0".to_string(),
        ));
    }

    if config.max_load_triggers < 1 {
        return Err(ConfigError::Validation(format!(
            "max-load-triggers must be >= 1, got {}",
            config.max_load_triggers
        )));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_items == Some(0) {
        return Err(ConfigError::Validation(
            "max-items must be >= 1 when set".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.full_name.is_empty() {
        return Err(ConfigError::Validation(
            "full-name cannot be empty".to_string(),
        ));
    }

    if config.partial_name.is_empty() {
        return Err(ConfigError::Validation(
            "partial-name cannot be empty".to_string(),
        ));
    }

    // A partial snapshot must never overwrite a complete result
    if config.full_name == config.partial_name {
        return Err(ConfigError::Validation(format!(
            "full-name and partial-name must differ, both are '{}'",
            config.full_name
        )));
    }

    Ok(())
}

fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (key, value) in config.entries() {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{}' cannot be empty",
                key
            )));
        }
    }
    Ok(())
}
