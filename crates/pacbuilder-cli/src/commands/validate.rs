//! Validate command - check an existing PAC file

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pacbuilder_core::PacValidator;
use std::path::{Path, PathBuf};

use super::config::load_config;

/// Validate command arguments
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// PAC file to validate
    pub file: PathBuf,

    /// Skip the JavaScript engine syntax check
    #[arg(long)]
    pub structural_only: bool,
}

/// Execute validate command
pub fn execute(args: ValidateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let validator = if args.structural_only {
        PacValidator::structural()
    } else {
        PacValidator::detect(&config.validation)
    };

    let report = validator.validate(&source);
    for finding in report.findings() {
        if finding.is_failure() {
            println!("  {} {}", "✗".red(), finding);
        } else if finding.is_warning() {
            println!("  {} {}", "!".yellow(), finding);
        } else {
            println!("  {} {}", "•".dimmed(), finding);
        }
    }

    report
        .into_result()
        .with_context(|| format!("{} is not a valid PAC file", args.file.display()))?;

    println!("{} {} is valid", "✓".green(), args.file.display());
    Ok(())
}
