//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::commands::build::BuildArgs;
use crate::commands::Command;

/// zscaler-dr-pacbuilder - proxy.pac generator for Zscaler ZIA DR mode
///
/// Reads domains from an allow list, drops the ones Zscaler already
/// publishes as pre-selected DR destinations, renders a PAC file and
/// validates it before writing.
#[derive(Parser, Debug)]
#[command(name = "pacbuilder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute (default: build)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Build options used when no subcommand is given
    #[command(flatten)]
    pub build: BuildArgs,

    /// Configuration file path
    #[arg(short = 'c', long, global = true, env = "PACBUILDER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}
