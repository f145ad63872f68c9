//! Domain values and the grammar that admits them
//!
//! A [`Domain`] can only be obtained through a [`DomainGrammar`], so any
//! `Domain` in the pipeline is already lowercase and well-formed.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Labels of 1-63 chars without edge hyphens, at least two labels, alphabetic TLD
pub const DEFAULT_DOMAIN_PATTERN: &str = r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,63}$";

/// Shell and markup punctuation that can never appear in an allow-list entry
pub const DEFAULT_FORBIDDEN_CHARS: &str = "\"',;:!@#$%^&*()+=[]{}<>|\\~` \t";

/// A validated, lowercase hostname
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// The domain as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Domain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Why a token was not accepted as a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Token contains forbidden characters; carries a readable list of them
    InvalidCharacters(String),
    /// Token is clean but does not match the domain pattern
    Malformed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacters(chars) => write!(f, "contains invalid characters ({chars})"),
            Self::Malformed => f.write_str("invalid domain"),
        }
    }
}

/// Compiled domain pattern plus the forbidden character set
#[derive(Debug, Clone)]
pub struct DomainGrammar {
    pattern: Regex,
    forbidden: BTreeSet<char>,
}

impl DomainGrammar {
    /// Build a grammar from a regex pattern and a forbidden character set
    pub fn new(pattern: &str, forbidden: impl IntoIterator<Item = char>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::config_value("domains.pattern", e.to_string()))?;
        Ok(Self {
            pattern,
            forbidden: forbidden.into_iter().collect(),
        })
    }

    /// Whether an already-normalized candidate matches the pattern
    pub fn matches(&self, candidate: &str) -> bool {
        self.pattern.is_match(candidate)
    }

    /// Describe the forbidden characters in `token`, or `None` if it is clean
    ///
    /// Characters are listed once each, in code-point order.
    pub fn invalid_chars(&self, token: &str) -> Option<String> {
        let found: BTreeSet<char> = token
            .chars()
            .filter(|c| self.forbidden.contains(c) || c.is_whitespace())
            .collect();

        if found.is_empty() {
            return None;
        }

        let descriptions: Vec<String> = found.into_iter().map(describe_char).collect();
        Some(descriptions.join(", "))
    }

    /// Normalize `token` (trim, lowercase) and check it against the grammar
    pub fn parse(&self, token: &str) -> std::result::Result<Domain, Rejection> {
        let candidate = token.trim().to_lowercase();

        if let Some(chars) = self.invalid_chars(&candidate) {
            return Err(Rejection::InvalidCharacters(chars));
        }
        if !self.matches(&candidate) {
            return Err(Rejection::Malformed);
        }

        Ok(Domain(candidate))
    }
}

impl Default for DomainGrammar {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_DOMAIN_PATTERN).expect("built-in domain pattern compiles"),
            forbidden: DEFAULT_FORBIDDEN_CHARS.chars().collect(),
        }
    }
}

fn describe_char(c: char) -> String {
    match c {
        '"' => "double quote (\")".to_string(),
        '\'' => "single quote (')".to_string(),
        ',' => "comma (,)".to_string(),
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        c if c.is_whitespace() => format!("whitespace (U+{:04X})", c as u32),
        c => format!("'{c}'"),
    }
}
