//! Per-destination session cache
//!
//! One reusable HTTP session per (host, port) pair: the first request to a
//! destination creates and stores its client, every later request reuses
//! it. Sessions are never evicted; they live as long as the engine. The
//! cache is owned by a single fetcher, which is the serialization point if
//! the design is ever extended to parallel fetch workers.

use crate::config::ProxyConfig;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Settings applied to every session the cache creates
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// User-Agent sent with every request
    pub user_agent: Option<String>,
    /// Proxy to route requests through
    pub proxy: Option<ProxyConfig>,
    /// Request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification (explicit opt-in)
    pub accept_invalid_certs: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            proxy: None,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// Keyed store of reusable sessions per (host, port)
pub struct SessionCache {
    sessions: HashMap<(String, u16), Client>,
    settings: SessionSettings,
}

impl SessionCache {
    /// Creates an empty cache with the given session settings
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            sessions: HashMap::new(),
            settings,
        }
    }

    /// Returns the session for a destination, creating it on first use
    ///
    /// Idempotent per key: repeated calls with the same (host, port) return
    /// the same stored client.
    pub fn session_for(&mut self, host: &str, port: u16) -> Result<&Client, reqwest::Error> {
        let key = (host.to_string(), port);

        if !self.sessions.contains_key(&key) {
            tracing::debug!("Opening session for {}:{}", host, port);
            let client = self.build_session()?;
            self.sessions.insert(key.clone(), client);
        }

        Ok(&self.sessions[&key])
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns whether the cache holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn build_session(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(self.settings.timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true);

        if let Some(user_agent) = &self.settings.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        if self.settings.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = &self.settings.proxy {
            let mut p = reqwest::Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))?;
            if let (Some(user), Some(password)) = (&proxy.username, &proxy.password) {
                p = p.basic_auth(user, password);
            }
            builder = builder.proxy(p);
        }

        builder.build()
    }
}
