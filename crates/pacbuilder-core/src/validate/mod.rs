//! PAC validation
//!
//! Two layers:
//! - Structural checks that only look for required markers in the text
//! - An optional syntax check delegated to an external JavaScript engine
//!
//! Validation never errors on a bad document; it returns a
//! [`ValidationReport`] whose findings say what is wrong.

mod node;

pub use node::NodeValidator;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of handing a script to a JavaScript engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCheck {
    /// Engine parsed the script
    Accepted,
    /// Engine reported a syntax error; carries its diagnostic text
    Rejected(String),
    /// Engine could not be started
    Unavailable(String),
    /// Engine did not finish in time
    TimedOut(Duration),
}

/// JavaScript engine able to syntax-check a script
#[cfg_attr(test, mockall::automock)]
pub trait ScriptValidator {
    /// Engine name for messages
    fn engine(&self) -> String;

    /// Parse `source` without running `FindProxyForURL`
    fn check(&self, source: &str) -> ScriptCheck;
}

/// A single validation observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// `function FindProxyForURL` is absent
    MissingFunction,
    /// No `"DIRECT"` / `'DIRECT'` return value
    MissingDirect,
    /// No `"PROXY` / `'PROXY` return value
    MissingProxy,
    /// Engine rejected the script
    ScriptRejected {
        /// Engine name
        engine: String,
        /// Engine diagnostic
        message: String,
    },
    /// Engine accepted the script
    ScriptAccepted {
        /// Engine name
        engine: String,
    },
    /// Engine could not be started, syntax check skipped
    EngineUnavailable {
        /// Engine name
        engine: String,
        /// Why it could not be started
        reason: String,
    },
    /// Engine timed out, treated as a pass
    EngineTimedOut {
        /// Engine name
        engine: String,
        /// Timeout that expired
        after: Duration,
    },
    /// No engine configured or installed
    SyntaxCheckSkipped,
}

impl Finding {
    /// Whether this finding fails validation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingFunction | Self::MissingDirect | Self::MissingProxy | Self::ScriptRejected { .. }
        )
    }

    /// Whether this finding deserves a warning without failing
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EngineTimedOut { .. } | Self::EngineUnavailable { .. })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFunction => f.write_str("missing FindProxyForURL function"),
            Self::MissingDirect => f.write_str("no DIRECT return found"),
            Self::MissingProxy => f.write_str("no PROXY return found"),
            Self::ScriptRejected { engine, message } => write!(f, "{engine}: {message}"),
            Self::ScriptAccepted { engine } => {
                write!(f, "PAC file passed {engine} syntax validation")
            }
            Self::EngineUnavailable { engine, reason } => {
                write!(f, "{engine} could not be run ({reason}), skipping JavaScript syntax validation")
            }
            Self::EngineTimedOut { engine, after } => {
                write!(f, "{engine} validation timed out after {}s", after.as_secs_f32())
            }
            Self::SyntaxCheckSkipped => {
                f.write_str("no JavaScript engine available, skipping syntax validation")
            }
        }
    }
}

/// All findings for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// True when no finding is a failure
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_failure)
    }

    /// Every finding, in check order
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Messages of the failing findings
    pub fn failures(&self) -> Vec<String> {
        self.findings
            .iter()
            .filter(|f| f.is_failure())
            .map(ToString::to_string)
            .collect()
    }

    /// Turn a failing report into [`Error::ValidationFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(Error::ValidationFailed {
                reasons: self.failures(),
            })
        }
    }
}

/// Validates rendered PAC scripts
#[derive(Default)]
pub struct PacValidator {
    script: Option<Box<dyn ScriptValidator>>,
}

impl fmt::Debug for PacValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacValidator")
            .field("engine", &self.script.as_ref().map(|s| s.engine()))
            .finish()
    }
}

impl PacValidator {
    /// Structural checks only
    pub fn structural() -> Self {
        Self { script: None }
    }

    /// Structural checks plus a syntax check through `script`
    pub fn with_script_validator<V: ScriptValidator + 'static>(script: V) -> Self {
        Self {
            script: Some(Box::new(script)),
        }
    }

    /// Look up the configured engine on `PATH` and use it if present
    pub fn detect(config: &ValidationConfig) -> Self {
        match NodeValidator::detect(&config.engine, config.timeout()) {
            Some(node) => {
                debug!(engine = %config.engine, "JavaScript engine found");
                Self::with_script_validator(node)
            }
            None => {
                info!(
                    "{} not found, skipping JavaScript syntax validation",
                    config.engine
                );
                Self::structural()
            }
        }
    }

    /// Whether an engine-backed syntax check will run
    pub fn has_script_validator(&self) -> bool {
        self.script.is_some()
    }

    /// Validate a PAC script
    pub fn validate(&self, pac: &str) -> ValidationReport {
        let mut findings = structural_findings(pac);

        // Engine output for a structurally broken file adds nothing
        if findings.is_empty() {
            findings.push(self.syntax_finding(pac));
        }

        ValidationReport { findings }
    }

    fn syntax_finding(&self, pac: &str) -> Finding {
        let Some(script) = &self.script else {
            return Finding::SyntaxCheckSkipped;
        };

        let engine = script.engine();
        match script.check(pac) {
            ScriptCheck::Accepted => Finding::ScriptAccepted { engine },
            ScriptCheck::Rejected(message) => Finding::ScriptRejected { engine, message },
            ScriptCheck::Unavailable(reason) => Finding::EngineUnavailable { engine, reason },
            ScriptCheck::TimedOut(after) => Finding::EngineTimedOut { engine, after },
        }
    }
}

fn structural_findings(pac: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !pac.contains("function FindProxyForURL") {
        findings.push(Finding::MissingFunction);
    }
    if !pac.contains("\"DIRECT\"") && !pac.contains("'DIRECT'") {
        findings.push(Finding::MissingDirect);
    }
    if !pac.contains("\"PROXY") && !pac.contains("'PROXY") {
        findings.push(Finding::MissingProxy);
    }

    findings
}
