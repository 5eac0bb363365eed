//! Crawl controller: the run/pause state machine
//!
//! The controller drives the fetch/extract/enqueue cycle over the frontier:
//! dequeue a URL, fetch it, record the outcome, offer every discovered link
//! to the admission gate, dispatch observers, optionally wait a fixed delay,
//! repeat. The loop exits when the queue empties or the state flips to
//! Paused; pausing is cooperative and never interrupts an in-flight fetch.

use crate::config::Config;
use crate::crawler::fetcher::{Fetch, HttpFetcher};
use crate::frontier::{AdmissionRules, Frontier, FrontierSnapshot};
use crate::observers::Observers;
use crate::rules::RuleSet;
use crate::url::normalize_url;
use crate::{ConfigError, CrawlError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Crawl state flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// Not advancing; the initial state
    Paused,
    /// Actively draining the queue
    Running,
}

/// Clonable remote control for a running crawl
///
/// Lets observer callbacks or other tasks pause and resume an engine that
/// another task is driving. Pausing takes effect at the next loop check.
#[derive(Debug, Clone)]
pub struct CrawlHandle {
    running: Arc<AtomicBool>,
}

impl CrawlHandle {
    /// Requests a cooperative pause
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Sets the state back to Running (the loop must be re-entered via
    /// [`Crawler::run`])
    pub fn resume(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Current state
    pub fn state(&self) -> CrawlState {
        if self.running.load(Ordering::SeqCst) {
            CrawlState::Running
        } else {
            CrawlState::Paused
        }
    }
}

/// The crawl engine: frontier, observers, fetcher, and the state machine
pub struct Crawler<F: Fetch> {
    frontier: Frontier,
    observers: Observers,
    fetcher: F,
    delay: Duration,
    running: Arc<AtomicBool>,
}

impl Crawler<HttpFetcher> {
    /// Builds an engine from configuration, with the HTTP fetcher
    ///
    /// Compiles the four rule sets, seeds the initial history and queue
    /// (initial-queue entries pass the same admission gate as discovered
    /// links), and wires the per-destination session cache. A malformed
    /// configured URL fails here, before any frontier state is built up.
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let rules = AdmissionRules {
            schemes: config.crawler.accepted_schemes.iter().cloned().collect(),
            host: compile_rules(&config.rules.host.accept, &config.rules.host.reject)?,
            port: compile_rules(&config.rules.port.accept, &config.rules.port.reject)?,
            link: compile_rules(&config.rules.link.accept, &config.rules.link.reject)?,
            extension: compile_rules(
                &config.rules.extension.accept,
                &config.rules.extension.reject,
            )?,
        };

        let mut crawler = Self::with_fetcher(HttpFetcher::new(config), rules);
        crawler.delay = Duration::from_millis(config.crawler.delay_ms);

        for entry in &config.initial_history {
            crawler.frontier.record_visited(normalize_url(entry)?);
        }
        for entry in &config.initial_queue {
            crawler.admit(&normalize_url(entry)?);
        }

        Ok(crawler)
    }
}

impl<F: Fetch> Crawler<F> {
    /// Builds an engine around any fetcher implementation
    ///
    /// The initial state is Paused with an empty frontier.
    pub fn with_fetcher(fetcher: F, rules: AdmissionRules) -> Self {
        Self {
            frontier: Frontier::with_rules(rules),
            observers: Observers::new(),
            fetcher,
            delay: Duration::ZERO,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets the fixed inter-request delay
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Mutable access to the observer registry, for registration
    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// Read access to the frontier
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Read access to the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Exports the frontier for external serialization
    pub fn snapshot(&self) -> FrontierSnapshot {
        self.frontier.snapshot()
    }

    /// Returns a clonable pause/resume handle
    pub fn handle(&self) -> CrawlHandle {
        CrawlHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Current state
    pub fn state(&self) -> CrawlState {
        self.handle().state()
    }

    /// Requests a cooperative pause
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Sets the state to Running without entering the loop
    pub fn resume(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Offers a URL to the admission gate
    ///
    /// This is the same gate discovered links pass: dedup, scheme, host,
    /// port, link, and extension checks, with observer dispatch on
    /// acceptance.
    pub fn admit(&mut self, url: &Url) -> bool {
        self.frontier.admit(url, &self.observers)
    }

    /// Admits a seed URL, transitions to Running, and enters the run loop
    pub async fn start_at(&mut self, url: &str) -> Result<(), CrawlError> {
        let seed = normalize_url(url)?;
        self.admit(&seed);
        self.resume();
        self.run().await;
        Ok(())
    }

    /// Runs the fetch/extract/enqueue loop
    ///
    /// Advances while the state is Running and the queue is non-empty.
    /// Queue exhaustion exits without changing the state flag; a pause is
    /// observed between iterations. Fetch failures are recorded and the
    /// loop continues; a panicking observer propagates with the frontier
    /// consistent up to the fault.
    pub async fn run(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            let Some(url) = self.frontier.dequeue() else {
                tracing::info!("Queue drained, crawl idle");
                break;
            };

            tracing::debug!("Fetching {}", url);
            match self.fetcher.fetch(&url).await {
                Ok(page) => {
                    self.frontier.record_visited(url);

                    for link in &page.links {
                        match normalize_url(link) {
                            Ok(normalized) => {
                                self.frontier.admit(&normalized, &self.observers);
                            }
                            Err(e) => {
                                tracing::debug!("Skipping unparsable link {}: {}", link, e);
                            }
                        }
                    }

                    self.observers.notify_page(&page);
                }
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", url, e);
                    self.frontier.record_failed(url, &self.observers);
                }
            }

            if !self.delay.is_zero() && !self.frontier.is_empty() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}

/// Compiles config pattern strings into a rule set
fn compile_rules(accept: &[String], reject: &[String]) -> Result<RuleSet, CrawlError> {
    RuleSet::from_patterns(accept, reject)
        .map_err(|e| CrawlError::Config(ConfigError::InvalidPattern(e.to_string())))
}
