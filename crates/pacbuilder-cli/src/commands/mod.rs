//! CLI commands

pub mod build;
pub mod check;
pub mod completions;
pub mod config;
pub mod validate;

use clap::Subcommand;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the PAC file (default when no subcommand is given)
    Build(build::BuildArgs),

    /// Validate an existing PAC file
    Validate(validate::ValidateArgs),

    /// Check a single domain against the allow-list grammar
    Check(check::CheckArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
