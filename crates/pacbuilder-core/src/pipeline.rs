//! PAC build pipeline
//!
//! parse allow-list → fetch exclusions → deduplicate → render → validate → write
//!
//! Deduplication and validation are optional collaborators; leaving one out
//! skips that stage. Nothing is written unless every stage before the write
//! succeeded.

use crate::allowlist::AllowList;
use crate::config::Config;
use crate::dedup::deduplicate;
use crate::domain::{Domain, DomainGrammar};
use crate::error::{Error, Result};
use crate::exclusion::{ExclusionSource, HttpExclusionSource};
use crate::render::PacRenderer;
use crate::validate::{PacValidator, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// Summary of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Valid domains read from the allow-list
    pub loaded: usize,
    /// Allow-list lines that were skipped
    pub skipped_lines: usize,
    /// Domains dropped because the exclusion list already covers them
    pub removed: Vec<Domain>,
    /// Domains written to the PAC file, in order
    pub published: Vec<Domain>,
    /// Where the PAC file was written
    pub output: PathBuf,
    /// Validation findings, if validation ran
    pub validation: Option<ValidationReport>,
}

/// Sequential PAC build
pub struct Pipeline {
    grammar: DomainGrammar,
    allow_list: PathBuf,
    output: PathBuf,
    renderer: PacRenderer,
    exclusions: Option<Box<dyn ExclusionSource>>,
    validator: Option<PacValidator>,
}

impl Pipeline {
    /// Pipeline with neither deduplication nor validation
    pub fn new(
        grammar: DomainGrammar,
        allow_list: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        renderer: PacRenderer,
    ) -> Self {
        Self {
            grammar,
            allow_list: allow_list.into(),
            output: output.into(),
            renderer,
            exclusions: None,
            validator: None,
        }
    }

    /// Build the pipeline a configuration describes
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let renderer = PacRenderer::from_config(config.paths.template_dir.as_deref(), &config.render)?;
        let mut pipeline = Self::new(
            config.domains.grammar()?,
            &config.paths.allow_list,
            &config.paths.output,
            renderer,
        );

        if config.exclusions.enabled {
            pipeline = pipeline.with_exclusion_source(HttpExclusionSource::from_config(&config.exclusions));
        }
        if config.validation.enabled {
            pipeline = pipeline.with_validator(PacValidator::detect(&config.validation));
        }

        Ok(pipeline)
    }

    /// Deduplicate against `source`
    pub fn with_exclusion_source<S: ExclusionSource + 'static>(mut self, source: S) -> Self {
        self.exclusions = Some(Box::new(source));
        self
    }

    /// Validate with `validator` before writing
    pub fn with_validator(mut self, validator: PacValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Output path
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run every stage and write the PAC file
    #[instrument(skip(self), fields(allow_list = %self.allow_list.display()))]
    pub fn run(&self) -> Result<BuildReport> {
        // 1. Parse allow list
        let list = AllowList::load(&self.allow_list, &self.grammar)?;
        for diagnostic in list.diagnostics() {
            warn!("{}", diagnostic);
        }
        info!(
            "Loaded {} domain(s) from {}",
            list.len(),
            self.allow_list.display()
        );

        let loaded = list.len();
        let skipped_lines = list.diagnostics().len();
        let mut domains = list.into_domains();
        let mut removed = Vec::new();

        // 2-3. Deduplicate against the exclusion list
        if let Some(source) = &self.exclusions {
            debug!(source = %source.describe(), "Deduplicating against exclusion list");
            let excluded = source.fetch(&self.grammar);
            if !excluded.is_empty() {
                let partition = deduplicate(&domains, &excluded);
                if !partition.removed.is_empty() {
                    info!(
                        "Removed {} domain(s) already in Zscaler pre-selected list: {}",
                        partition.removed.len(),
                        join(&partition.removed)
                    );
                }
                if partition.kept.is_empty() {
                    return Err(Error::NothingLeftToPublish {
                        removed: partition.removed.len(),
                    });
                }
                domains = partition.kept;
                removed = partition.removed;
            }
        }

        // 4. Render
        let pac = self.renderer.render(&domains)?;

        // 5. Validate
        let validation = match &self.validator {
            Some(validator) => {
                let report = validator.validate(pac.as_str());
                log_findings(&report);
                Some(report.into_result()?)
            }
            None => None,
        };

        // 6. Write
        pac.write_to(&self.output)?;
        info!(
            "Generated {} with {} domain(s)",
            self.output.display(),
            domains.len()
        );

        Ok(BuildReport {
            loaded,
            skipped_lines,
            removed,
            published: domains,
            output: self.output.clone(),
            validation,
        })
    }
}

fn join(domains: &[Domain]) -> String {
    domains.iter().map(Domain::as_str).collect::<Vec<_>>().join(", ")
}

fn log_findings(report: &ValidationReport) {
    for finding in report.findings() {
        if finding.is_failure() {
            error!("Validation error: {}", finding);
        } else if finding.is_warning() {
            warn!("{}", finding);
        } else {
            info!("{}", finding);
        }
    }
}
