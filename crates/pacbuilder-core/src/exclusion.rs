//! Remote exclusion list
//!
//! Zscaler publishes the destinations it already handles in DR mode. Any
//! allow-listed domain found there is redundant in the PAC file. Fetching
//! the list is best effort: every failure degrades to an empty set.

use crate::config::ExclusionsConfig;
use crate::domain::{Domain, DomainGrammar};
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User-Agent string sent with the exclusion list request
pub const USER_AGENT: &str = concat!("zscaler-dr-pacbuilder/", env!("CARGO_PKG_VERSION"));

/// Set of apex domains published by the remote authority
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    domains: HashSet<Domain>,
}

impl ExclusionSet {
    /// Parse a plain-text exclusion list body
    ///
    /// `*.` wildcard prefixes are reduced to the apex domain. Entries the
    /// grammar rejects are dropped without a warning since the remote list
    /// legitimately carries non-domain entries.
    pub fn parse(body: &str, grammar: &DomainGrammar) -> Self {
        let domains = body
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let apex = line.strip_prefix("*.").unwrap_or(&line);
                grammar.parse(apex).ok()
            })
            .collect();

        Self { domains }
    }

    /// Whether `domain` is excluded
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Number of excluded domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl FromIterator<Domain> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().collect(),
        }
    }
}

/// Source of exclusion domains
///
/// Implementations must not fail: an unavailable source yields an empty set.
pub trait ExclusionSource {
    /// Describe the source for logging
    fn describe(&self) -> String;

    /// Fetch the current exclusion set
    fn fetch(&self, grammar: &DomainGrammar) -> ExclusionSet;
}

/// Exclusion source backed by a single HTTP GET
#[derive(Debug, Clone)]
pub struct HttpExclusionSource {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpExclusionSource {
    /// Create a source for `url` with the default timeout and User-Agent
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = ExclusionsConfig::default();
        Self {
            url: url.into(),
            timeout: defaults.timeout(),
            user_agent: defaults.user_agent,
        }
    }

    /// Create from configuration
    pub fn from_config(config: &ExclusionsConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn download(&self) -> Result<String, String> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        let response = client.get(&self.url).send().map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body = response.bytes().map_err(|e| e.to_string())?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl ExclusionSource for HttpExclusionSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self, grammar: &DomainGrammar) -> ExclusionSet {
        debug!(url = %self.url, timeout = ?self.timeout, "Fetching exclusion list");

        match self.download() {
            Ok(body) => {
                let set = ExclusionSet::parse(&body, grammar);
                info!(url = %self.url, count = set.len(), "Fetched Zscaler pre-selected destinations");
                set
            }
            Err(e) => {
                warn!(
                    url = %self.url,
                    "could not fetch Zscaler pre-selected destinations: {}",
                    e
                );
                ExclusionSet::default()
            }
        }
    }
}
