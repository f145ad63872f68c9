//! Logging initialization
//!
//! Console output goes to stderr so stdout stays free for command output
//! (`config show`, `completions`).

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize logging based on CLI arguments
pub fn init(args: &Args) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level(args).into())
        .from_env_lossy();

    let console = match args.log_format {
        LogFormat::Text => fmt::layer()
            .with_writer(io::stderr)
            .with_target(args.verbose >= 2)
            .with_file(args.verbose >= 3)
            .with_line_number(args.verbose >= 3)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
    };

    let file_layer = match args.log_file.as_deref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path))?;
            let writer = Mutex::new(file);
            Some(match args.log_format {
                LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
                _ => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
            })
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn level(args: &Args) -> Level {
    if args.quiet {
        return Level::ERROR;
    }
    match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
