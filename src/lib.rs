//! Gatewalk: a rule-gated web crawl engine
//!
//! This crate implements a polite, breadth-first web crawler: seed URLs are
//! fetched, outbound links are extracted, and every discovered link passes a
//! rule-based admission gate before it may ever be queued. The crawl runs
//! until the frontier empties or the operator pauses it.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod observers;
pub mod rules;
pub mod url;

use thiserror::Error;

/// Main error type for gatewalk operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid rule pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for gatewalk operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{extension_of, normalize_url, port_of};
pub use config::Config;
pub use crawler::{CrawlHandle, CrawlState, Crawler, Fetch, FetchError, HttpFetcher, Page};
pub use frontier::{AdmissionRules, Frontier, FrontierSnapshot};
pub use observers::Observers;
pub use rules::{Pattern, RuleSet};
