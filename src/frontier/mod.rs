//! URL frontier: queue, history, failures, and the admission gate
//!
//! The frontier owns the crawl's progress state:
//! - `queue`: FIFO list of URLs waiting to be fetched, no duplicates
//! - `history`: insertion-ordered, append-only list of visited URLs
//! - `failures`: append-only list of URLs whose fetch failed
//!
//! Every discovered URL passes through [`Frontier::admit`], the single gate
//! that combines dedup with the five filter dimensions (scheme, host, port,
//! link, extension). A URL is fetched at most once for the lifetime of the
//! frontier.

use crate::observers::Observers;
use crate::rules::RuleSet;
use crate::url::{extension_of, port_of};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Admission filters applied to every discovered URL
#[derive(Debug, Default)]
pub struct AdmissionRules {
    /// Schemes eligible for traversal; an empty set accepts every scheme
    pub schemes: HashSet<String>,
    /// Rules over the URL host
    pub host: RuleSet,
    /// Rules over the URL port (tested as its decimal string)
    pub port: RuleSet,
    /// Rules over the full normalized URL string
    pub link: RuleSet,
    /// Rules over the path's file extension (empty string when absent)
    pub extension: RuleSet,
}

/// Exported view of the frontier for external serialization
#[derive(Debug, Clone, Serialize)]
pub struct FrontierSnapshot {
    pub queue: Vec<String>,
    pub history: Vec<String>,
    pub failures: Vec<String>,
}

/// The crawl frontier: pending queue, visit history, and failure list
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<Url>,
    history: Vec<Url>,
    visited: HashSet<Url>,
    failures: Vec<Url>,
    failed: HashSet<Url>,
    rules: AdmissionRules,
}

impl Frontier {
    /// Creates an empty frontier that admits everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier with the given admission rules
    pub fn with_rules(rules: AdmissionRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Returns whether a URL is waiting in the queue
    pub fn is_queued(&self, url: &Url) -> bool {
        self.queued.contains(url)
    }

    /// Returns whether a URL has been visited
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Returns whether a URL has failed
    pub fn is_failed(&self, url: &Url) -> bool {
        self.failed.contains(url)
    }

    /// Returns the number of URLs waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Read access to the visit history, in visit order
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    /// Read access to the failure list, in failure order
    pub fn failures(&self) -> &[Url] {
        &self.failures
    }

    /// Offers a URL to the admission gate
    ///
    /// Returns true and enqueues the URL iff all of the following hold: the
    /// URL has not been visited, queued, or failed; its scheme is in the
    /// accepted set (an empty set accepts all); and its host, port, full
    /// string form, and path extension each pass their rule set.
    ///
    /// On acceptance the every-URL and matching pattern observers are
    /// dispatched before the URL is appended to the queue, so observers only
    /// ever see URLs that will actually be traversed. On rejection nothing
    /// is mutated and nothing is dispatched.
    pub fn admit(&mut self, url: &Url, observers: &Observers) -> bool {
        if self.visited.contains(url) || self.queued.contains(url) || self.failed.contains(url) {
            return false;
        }

        if !self.rules.schemes.is_empty() && !self.rules.schemes.contains(url.scheme()) {
            return false;
        }

        let host = url.host_str().unwrap_or("");
        if !self.rules.host.accepts(host) {
            return false;
        }

        if !self.rules.port.accepts(&port_of(url).to_string()) {
            return false;
        }

        if !self.rules.link.accepts(url.as_str()) {
            return false;
        }

        if !self.rules.extension.accepts(&extension_of(url)) {
            return false;
        }

        observers.notify_admitted(url);

        self.queued.insert(url.clone());
        self.queue.push_back(url.clone());
        true
    }

    /// Removes and returns the head of the queue
    ///
    /// Ordering is breadth-first in discovery order, within and across
    /// pages.
    pub fn dequeue(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a successfully visited URL in the history
    ///
    /// History is append-only and deduplicated; the visited-candidate
    /// observers already fired at admission, so nothing is dispatched here.
    pub fn record_visited(&mut self, url: Url) {
        if self.visited.insert(url.clone()) {
            self.history.push(url);
        }
    }

    /// Records a failed URL, dispatching failed-URL observers first
    ///
    /// Dispatch runs before the append, matching the admission convention:
    /// observers inspect state from before the mutation. The list itself is
    /// append-only and does not deduplicate direct calls.
    pub fn record_failed(&mut self, url: Url, observers: &Observers) {
        observers.notify_failed(&url);
        self.failed.insert(url.clone());
        self.failures.push(url);
    }

    /// Exports queue, history, and failures as plain URL strings
    pub fn snapshot(&self) -> FrontierSnapshot {
        FrontierSnapshot {
            queue: self.queue.iter().map(Url::to_string).collect(),
            history: self.history.iter().map(Url::to_string).collect(),
            failures: self.failures.iter().map(Url::to_string).collect(),
        }
    }
}
