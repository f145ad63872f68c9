//! Error types for pacbuilder-core
//!
//! Centralized error handling using `thiserror`. Every variant here is fatal
//! for a run; recoverable conditions (malformed lines, fetch failures, a
//! missing script engine) are reported as diagnostics instead.

use thiserror::Error;

/// Main error type for pacbuilder-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Allow-list file does not exist
    #[error("allow list not found: {path}")]
    AllowListNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Allow-list yielded zero valid domains after filtering
    #[error("allow list contains no valid domains: {path}")]
    EmptyAllowList {
        /// Path of the allow-list
        path: String,
    },

    /// Every allow-listed domain is already covered by the exclusion list
    #[error("all {removed} domain(s) were removed by deduplication, nothing left to publish")]
    NothingLeftToPublish {
        /// Number of domains removed
        removed: usize,
    },

    /// Template file missing from the template directory
    #[error("template not found: {path}")]
    TemplateNotFound {
        /// Expected template path
        path: String,
    },

    /// Template failed to compile
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template failed to render
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Rendered PAC document failed validation
    #[error("PAC file validation failed: {}", .reasons.join("; "))]
    ValidationFailed {
        /// Human-readable failure reasons
        reasons: Vec<String>,
    },

    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an allow-list-not-found error
    pub fn allow_list_not_found(path: &std::path::Path) -> Self {
        Self::AllowListNotFound {
            path: path.display().to_string(),
        }
    }
}
