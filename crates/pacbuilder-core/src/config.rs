//! Configuration management for pacbuilder
//!
//! Every value the pipeline used to hard-code (remote URL, domain grammar,
//! timeouts, proxy address) lives here and is injected at startup. The file
//! format is TOML; every section is optional.

use crate::domain::{DomainGrammar, DEFAULT_DOMAIN_PATTERN, DEFAULT_FORBIDDEN_CHARS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Zscaler's published list of pre-selected DR destinations
pub const DEFAULT_EXCLUSION_URL: &str = "https://dll7xpq8c5ev0.cloudfront.net/drdb.txt";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input/output locations
    pub paths: PathsConfig,

    /// Remote exclusion list settings
    pub exclusions: ExclusionsConfig,

    /// Template rendering settings
    pub render: RenderConfig,

    /// PAC validation settings
    pub validation: ValidationConfig,

    /// Domain grammar
    pub domains: DomainsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config_value("config", e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.exclusions.enabled {
            reqwest::Url::parse(&self.exclusions.url)
                .map_err(|e| Error::config_value("exclusions.url", e.to_string()))?;
        }
        if self.exclusions.timeout_secs == 0 {
            return Err(Error::config_value(
                "exclusions.timeout_secs",
                "Must be greater than zero",
            ));
        }
        if self.exclusions.user_agent.trim().is_empty() {
            return Err(Error::config_value("exclusions.user_agent", "Must not be empty"));
        }
        if self.validation.timeout_secs == 0 {
            return Err(Error::config_value(
                "validation.timeout_secs",
                "Must be greater than zero",
            ));
        }
        if self.validation.engine.trim().is_empty() {
            return Err(Error::config_value("validation.engine", "Must not be empty"));
        }

        let proxy = self.render.proxy.as_str();
        if proxy.is_empty() || proxy.contains(char::is_whitespace) || proxy.contains('"') {
            return Err(Error::config_value(
                "render.proxy",
                "Must be a single host:port without whitespace or quotes",
            ));
        }

        self.domains.grammar()?;

        Ok(())
    }
}

/// Input/output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Domain allow-list
    pub allow_list: PathBuf,
    /// Generated PAC file
    pub output: PathBuf,
    /// Directory holding `proxy.pac.hbs` (None = built-in template)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            allow_list: PathBuf::from("allow-list.txt"),
            output: PathBuf::from("proxy.pac"),
            template_dir: None,
        }
    }
}

/// Remote exclusion list settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionsConfig {
    /// Deduplicate against the remote list
    pub enabled: bool,
    /// Source URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with the request
    pub user_agent: String,
}

impl ExclusionsConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_EXCLUSION_URL.to_string(),
            timeout_secs: 15,
            user_agent: crate::exclusion::USER_AGENT.to_string(),
        }
    }
}

/// Template rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Proxy `host:port` returned for allow-listed hosts
    pub proxy: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            proxy: "127.0.0.1:1".to_string(),
        }
    }
}

/// PAC validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run validation before writing
    pub enabled: bool,
    /// JavaScript engine command used for the syntax check
    pub engine: String,
    /// Per-invocation engine timeout in seconds
    pub timeout_secs: u64,
}

impl ValidationConfig {
    /// Engine timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: "node".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Domain grammar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainsConfig {
    /// Regular expression a lowercased domain must match
    pub pattern: String,
    /// Characters that reject an allow-list line outright
    pub forbidden_chars: String,
}

impl DomainsConfig {
    /// Compile the configured grammar
    pub fn grammar(&self) -> Result<DomainGrammar> {
        DomainGrammar::new(&self.pattern, self.forbidden_chars.chars())
    }
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DOMAIN_PATTERN.to_string(),
            forbidden_chars: DEFAULT_FORBIDDEN_CHARS.to_string(),
        }
    }
}
