use crate::config::types::{Config, CrawlerConfig, ProxyConfig, RulePatterns, RulesConfig};
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Every rule pattern must compile as a regex and every configured URL must
/// normalize, so that a bad configuration fails at load time instead of
/// mid-crawl.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    if let Some(proxy) = &config.proxy {
        validate_proxy_config(proxy)?;
    }
    validate_rules_config(&config.rules)?;
    validate_url_list("seeds", &config.seeds)?;
    validate_url_list("initial-queue", &config.initial_queue)?;
    validate_url_list("initial-history", &config.initial_history)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    for scheme in &config.accepted_schemes {
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_lowercase() || c == '+') {
            return Err(ConfigError::Validation(format!(
                "accepted scheme '{}' is not a lowercase scheme name",
                scheme
            )));
        }
    }

    Ok(())
}

/// Validates proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::Validation(
            "proxy host cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "proxy port cannot be 0".to_string(),
        ));
    }

    // Credentials travel together or not at all
    if config.username.is_some() != config.password.is_some() {
        return Err(ConfigError::Validation(
            "proxy username and password must both be set or both be omitted".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every rule pattern compiles
fn validate_rules_config(config: &RulesConfig) -> Result<(), ConfigError> {
    for (dimension, patterns) in [
        ("host", &config.host),
        ("port", &config.port),
        ("link", &config.link),
        ("extension", &config.extension),
    ] {
        validate_patterns(dimension, patterns)?;
    }
    Ok(())
}

fn validate_patterns(dimension: &str, patterns: &RulePatterns) -> Result<(), ConfigError> {
    for pattern in patterns.accept.iter().chain(patterns.reject.iter()) {
        regex::Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("rules.{}: '{}': {}", dimension, pattern, e))
        })?;
    }
    Ok(())
}

/// Validates that every URL in a list normalizes
fn validate_url_list(field: &str, urls: &[String]) -> Result<(), ConfigError> {
    for url in urls {
        normalize_url(url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: '{}': {}", field, url, e)))?;
    }
    Ok(())
}
