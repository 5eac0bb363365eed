//! Crawler module: fetching, parsing, sessions, and crawl control
//!
//! This module contains the crawl engine's moving parts:
//! - Per-destination session caching
//! - HTTP fetching with uniform failure classification
//! - HTML link extraction
//! - The run/pause state machine driving fetch-extract-enqueue cycles

mod controller;
mod fetcher;
mod parser;
mod session;

pub use controller::{CrawlHandle, CrawlState, Crawler};
pub use fetcher::{Fetch, FetchError, HttpFetcher, Page};
pub use parser::{extract_links, extract_title};
pub use session::{SessionCache, SessionSettings};

use crate::config::Config;
use crate::frontier::FrontierSnapshot;
use crate::url::normalize_url;

/// Runs a complete crawl from configuration
///
/// Builds the engine, admits every configured seed through the admission
/// gate, drains the queue, and returns the final frontier snapshot. This is
/// the main entry point for embedding a one-shot crawl.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(FrontierSnapshot)` - The queue/history/failures after the crawl
/// * `Err(CrawlError)` - Invalid configuration or seed URL
pub async fn crawl(config: &Config) -> crate::Result<FrontierSnapshot> {
    let mut crawler = Crawler::from_config(config)?;

    for seed in &config.seeds {
        let url = normalize_url(seed)?;
        crawler.admit(&url);
    }

    crawler.resume();
    crawler.run().await;

    Ok(crawler.snapshot())
}
