use serde::Deserialize;

/// Main configuration structure for gatewalk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub headers: HeaderConfig,

    /// Proxy to route every request through
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,

    /// Admission rule patterns, one table per filter dimension
    #[serde(default)]
    pub rules: RulesConfig,

    /// Seed URLs a one-shot crawl starts from
    #[serde(default)]
    pub seeds: Vec<String>,

    /// URLs pre-loaded into the queue (pass the admission gate)
    #[serde(rename = "initial-queue", default)]
    pub initial_queue: Vec<String>,

    /// URLs pre-loaded into the visit history
    #[serde(rename = "initial-history", default)]
    pub initial_history: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Fixed delay between requests (milliseconds)
    #[serde(rename = "delay-ms", default)]
    pub delay_ms: u64,

    /// Schemes eligible for traversal; an empty list accepts every scheme
    #[serde(rename = "accepted-schemes", default = "default_accepted_schemes")]
    pub accepted_schemes: Vec<String>,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification. Off by default; only enable when
    /// reachability matters more than transport authenticity.
    #[serde(rename = "accept-invalid-certs", default)]
    pub accept_invalid_certs: bool,
}

fn default_accepted_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            accepted_schemes: default_accepted_schemes(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    /// User-Agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Referer header sent with every request
    pub referer: Option<String>,
}

/// Proxy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Accept/reject pattern lists for all four filter dimensions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub host: RulePatterns,

    #[serde(default)]
    pub port: RulePatterns,

    #[serde(default)]
    pub link: RulePatterns,

    #[serde(default)]
    pub extension: RulePatterns,
}

/// Regex pattern strings for one filter dimension
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulePatterns {
    #[serde(default)]
    pub accept: Vec<String>,

    #[serde(default)]
    pub reject: Vec<String>,
}
