//! Page fetching: the transport seam and its HTTP implementation
//!
//! The controller only needs the capability "fetch(url) -> Page or a
//! recoverable failure". [`Fetch`] is that seam; [`HttpFetcher`] is the
//! production implementation built on reqwest and the per-destination
//! session cache. Every transport fault is translated into a
//! [`FetchError`] for the frontier to record; nothing here aborts a crawl.

use crate::config::Config;
use crate::crawler::parser::{extract_links, extract_title};
use crate::crawler::session::{SessionCache, SessionSettings};
use crate::url::port_of;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// The result of a successful fetch
///
/// Immutable after creation; the engine hands it to page observers and does
/// not retain it beyond the dispatch call.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, when present
    pub content_type: Option<String>,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Page title, when the body is HTML and has one
    pub title: Option<String>,
    /// Response body
    pub body: String,
    /// Outbound links in document order (absolute, un-normalized)
    pub links: Vec<String>,
}

/// Recoverable fetch failure
///
/// The controller records these in the frontier's failure list and moves
/// on; they never propagate as crawl errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to build session: {0}")]
    Session(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("URL not fetchable: {0}")]
    Malformed(String),
}

/// Capability of turning a queued URL into a Page
#[async_trait]
pub trait Fetch: Send {
    async fn fetch(&mut self, url: &Url) -> Result<Page, FetchError>;
}

/// HTTP fetcher backed by the per-destination session cache
pub struct HttpFetcher {
    sessions: SessionCache,
    referer: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher from the engine configuration
    pub fn new(config: &Config) -> Self {
        let settings = SessionSettings {
            user_agent: config.headers.user_agent.clone(),
            proxy: config.proxy.clone(),
            timeout: Duration::from_secs(config.crawler.timeout_secs),
            accept_invalid_certs: config.crawler.accept_invalid_certs,
        };

        Self {
            sessions: SessionCache::new(settings),
            referer: config.headers.referer.clone(),
        }
    }

    /// Number of live sessions (one per destination contacted so far)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<Page, FetchError> {
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::Malformed(format!("no host in {url}")))?;

        let client = self
            .sessions
            .session_for(host, port_of(url))
            .map_err(|e| FetchError::Session(e.to_string()))?;

        let mut request = client.get(url.clone());
        if let Some(referer) = &self.referer {
            request = request.header(reqwest::header::REFERER, referer.clone());
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // Only HTML bodies carry outbound links worth extracting
        let is_html = content_type
            .as_deref()
            .map_or(false, |ct| ct.contains("text/html"));
        let (title, links) = if is_html {
            (extract_title(&body), extract_links(&body, &final_url))
        } else {
            (None, Vec::new())
        };

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            content_type,
            headers,
            title,
            body,
            links,
        })
    }
}

/// Maps a reqwest error onto the recoverable failure taxonomy
fn classify_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}
