//! Build command - main PAC generation

use anyhow::{Context, Result};
use clap::Args;
use pacbuilder_core::{Config, Pipeline};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::config::load_config;

/// Build command arguments
///
/// Every flag is optional so values from the configuration file survive
/// unless explicitly overridden.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Domain allow list [default: allow-list.txt]
    #[arg(long, value_name = "FILE")]
    pub allow_list: Option<PathBuf>,

    /// Output PAC file [default: proxy.pac]
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory containing proxy.pac.hbs [default: built-in template]
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Exclusion list URL
    #[arg(long, value_name = "URL")]
    pub exclusion_url: Option<String>,

    /// Proxy returned for allow-listed hosts
    #[arg(long, value_name = "HOST:PORT")]
    pub proxy: Option<String>,

    /// Skip deduplication against Zscaler's pre-selected list
    #[arg(long)]
    pub skip_dedup: bool,

    /// Skip PAC validation
    #[arg(long)]
    pub skip_validation: bool,
}

impl BuildArgs {
    /// Whether no build flag was given
    pub fn is_unset(&self) -> bool {
        self.allow_list.is_none()
            && self.output.is_none()
            && self.template_dir.is_none()
            && self.exclusion_url.is_none()
            && self.proxy.is_none()
            && !self.skip_dedup
            && !self.skip_validation
    }

    /// Fill flags missing here from `outer`, the flags given before `build`
    pub fn or(self, outer: BuildArgs) -> Self {
        Self {
            allow_list: self.allow_list.or(outer.allow_list),
            output: self.output.or(outer.output),
            template_dir: self.template_dir.or(outer.template_dir),
            exclusion_url: self.exclusion_url.or(outer.exclusion_url),
            proxy: self.proxy.or(outer.proxy),
            skip_dedup: self.skip_dedup || outer.skip_dedup,
            skip_validation: self.skip_validation || outer.skip_validation,
        }
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref path) = self.allow_list {
            config.paths.allow_list = path.clone();
        }
        if let Some(ref path) = self.output {
            config.paths.output = path.clone();
        }
        if let Some(ref dir) = self.template_dir {
            config.paths.template_dir = Some(dir.clone());
        }
        if let Some(ref url) = self.exclusion_url {
            config.exclusions.url = url.clone();
        }
        if let Some(ref proxy) = self.proxy {
            config.render.proxy = proxy.clone();
        }
        if self.skip_dedup {
            config.exclusions.enabled = false;
        }
        if self.skip_validation {
            config.validation.enabled = false;
        }
    }
}

/// Execute build command
pub fn execute(args: BuildArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);

    if !config.exclusions.enabled {
        info!("Skipping deduplication");
    }
    if !config.validation.enabled {
        info!("Skipping validation");
    }
    debug!(?config, "Effective configuration");

    let pipeline = Pipeline::from_config(&config).context("Invalid configuration")?;
    let report = pipeline
        .run()
        .with_context(|| format!("Failed to build {}", config.paths.output.display()))?;

    debug!(
        loaded = report.loaded,
        skipped = report.skipped_lines,
        removed = report.removed.len(),
        published = report.published.len(),
        "Build finished"
    );

    Ok(())
}
