//! Allow-list loading
//!
//! File format:
//! - One domain per line
//! - Lines starting with # are comments
//! - Empty lines are ignored
//!
//! Malformed lines are skipped and reported as [`LineDiagnostic`] records
//! rather than aborting the load.

use crate::domain::{Domain, DomainGrammar, Rejection};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A skipped allow-list line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number
    pub line: usize,
    /// Line content without its terminator
    pub raw: String,
    /// Why the line was skipped
    pub reason: Rejection,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Rejection::InvalidCharacters(chars) => write!(
                f,
                "skipping line {} - contains invalid characters ({}): {}",
                self.line, chars, self.raw
            ),
            Rejection::Malformed => {
                write!(f, "skipping invalid domain on line {}: {}", self.line, self.raw)
            }
        }
    }
}

/// Sorted, unique allow-list domains plus the lines that were skipped
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    domains: Vec<Domain>,
    diagnostics: Vec<LineDiagnostic>,
}

impl AllowList {
    /// Load an allow-list from a file
    ///
    /// Fails if the file is missing or yields no valid domains.
    pub fn load<P: AsRef<Path>>(path: P, grammar: &DomainGrammar) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::allow_list_not_found(path));
        }

        let content = std::fs::read_to_string(path)?;
        let list = Self::parse(&content, grammar);

        if list.is_empty() {
            return Err(Error::EmptyAllowList {
                path: path.display().to_string(),
            });
        }

        debug!(
            path = %path.display(),
            domains = list.len(),
            skipped = list.diagnostics.len(),
            "Parsed allow list"
        );
        Ok(list)
    }

    /// Parse allow-list text; never fails, an empty result is for the caller to judge
    pub fn parse(content: &str, grammar: &DomainGrammar) -> Self {
        let mut domains = BTreeSet::new();
        let mut diagnostics = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match grammar.parse(line) {
                Ok(domain) => {
                    domains.insert(domain);
                }
                Err(reason) => diagnostics.push(LineDiagnostic {
                    line: index + 1,
                    raw: raw_line.trim_end().to_string(),
                    reason,
                }),
            }
        }

        Self {
            domains: domains.into_iter().collect(),
            diagnostics,
        }
    }

    /// Domains in sorted order
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Lines that were skipped, in file order
    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        &self.diagnostics
    }

    /// Number of valid domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Check if no valid domains were found
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Take the domain list
    pub fn into_domains(self) -> Vec<Domain> {
        self.domains
    }
}
