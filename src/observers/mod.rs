//! Observer registry for crawl notifications
//!
//! Four independent channels, each an ordered list of callbacks invoked
//! synchronously in registration order:
//! - every admitted URL (fired before the URL is enqueued)
//! - admitted URLs matching a registered pattern
//! - failed URLs (fired before the failure is recorded)
//! - fetched pages (fired after history is updated and links admitted)
//!
//! No error isolation: a panicking callback propagates to the caller of the
//! run loop. Frontier state is consistent up to the point of the fault.

use crate::crawler::Page;
use crate::rules::Pattern;
use url::Url;

/// Callback over a URL event
pub type UrlCallback = Box<dyn Fn(&Url) + Send + Sync>;

/// Callback over a fetched page
pub type PageCallback = Box<dyn Fn(&Page) + Send + Sync>;

/// Ordered callback lists for each notification channel
#[derive(Default)]
pub struct Observers {
    every_url: Vec<UrlCallback>,
    url_patterns: Vec<(Pattern, UrlCallback)>,
    failed_urls: Vec<UrlCallback>,
    pages: Vec<PageCallback>,
}

impl Observers {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback fired for every admitted URL
    pub fn on_every_url(&mut self, callback: impl Fn(&Url) + Send + Sync + 'static) {
        self.every_url.push(Box::new(callback));
    }

    /// Registers a callback fired for admitted URLs whose string form
    /// matches `pattern`
    pub fn on_urls_matching(
        &mut self,
        pattern: Pattern,
        callback: impl Fn(&Url) + Send + Sync + 'static,
    ) {
        self.url_patterns.push((pattern, Box::new(callback)));
    }

    /// Registers a callback fired for every failed URL
    pub fn on_failed_url(&mut self, callback: impl Fn(&Url) + Send + Sync + 'static) {
        self.failed_urls.push(Box::new(callback));
    }

    /// Registers a callback fired for every successfully fetched page
    pub fn on_page(&mut self, callback: impl Fn(&Page) + Send + Sync + 'static) {
        self.pages.push(Box::new(callback));
    }

    /// Dispatches an admitted URL: the every-URL channel first, then any
    /// matching pattern channels, each in registration order
    pub(crate) fn notify_admitted(&self, url: &Url) {
        for callback in &self.every_url {
            callback(url);
        }
        for (pattern, callback) in &self.url_patterns {
            if pattern.matches(url.as_str()) {
                callback(url);
            }
        }
    }

    /// Dispatches a failed URL
    pub(crate) fn notify_failed(&self, url: &Url) {
        for callback in &self.failed_urls {
            callback(url);
        }
    }

    /// Dispatches a fetched page
    pub(crate) fn notify_page(&self, page: &Page) {
        for callback in &self.pages {
            callback(page);
        }
    }
}
