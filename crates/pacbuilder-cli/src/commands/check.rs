//! Check command - test a single domain against the grammar

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::config::load_config;

/// Check command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain to check (prefix with `--` if it starts with a hyphen)
    pub domain: String,
}

/// Execute check command
pub fn execute(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let grammar = config.domains.grammar()?;

    match grammar.parse(&args.domain) {
        Ok(domain) => {
            println!("{} {} → {}", "✓".green(), args.domain, domain.as_str().bold());
            Ok(())
        }
        Err(rejection) => {
            println!("{} {}: {}", "✗".red(), args.domain, rejection);
            anyhow::bail!("'{}' would be skipped: {}", args.domain, rejection)
        }
    }
}
