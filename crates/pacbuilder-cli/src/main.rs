//! zscaler-dr-pacbuilder CLI
//!
//! Generates proxy.pac files for Zscaler ZIA disaster-recovery mode.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone();
    let top_level = args.build;

    match args.command {
        // Default: build with the top-level flags
        None => commands::build::execute(top_level, config_path.as_deref()),
        Some(commands::Command::Build(build_args)) => {
            commands::build::execute(build_args.or(top_level), config_path.as_deref())
        }
        Some(_) if !top_level.is_unset() => {
            anyhow::bail!("build options can only be used without a subcommand or with 'build'")
        }
        Some(commands::Command::Validate(validate_args)) => {
            commands::validate::execute(validate_args, config_path.as_deref())
        }
        Some(commands::Command::Check(check_args)) => {
            commands::check::execute(check_args, config_path.as_deref())
        }
        Some(commands::Command::Config(config_args)) => {
            commands::config::execute(config_args, config_path.as_deref())
        }
        Some(commands::Command::Completions(comp_args)) => {
            commands::completions::execute(comp_args)
        }
    }
}
