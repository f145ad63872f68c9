//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use pacbuilder_core::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the working and user config directories
const CONFIG_FILE_NAME: &str = "pacbuilder.toml";

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Generate a configuration file with default values
    Generate {
        /// Output file path
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate (default: detect)
        file: Option<PathBuf>,
    },

    /// Show config file locations
    Paths,
}

/// Execute config command
pub fn execute(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config_path),
        ConfigAction::Generate { output, force } => generate_config(&output, force),
        ConfigAction::Validate { file } => validate_config(file.as_deref().or(config_path)),
        ConfigAction::Paths => show_paths(),
    }
}

/// Load the configuration from `explicit`, a discovered file, or defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = config.to_toml().context("Failed to serialize config")?;

    println!("{}", toml_str);
    Ok(())
}

fn generate_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let toml_str = Config::default()
        .to_toml()
        .context("Failed to serialize config")?;

    let content = format!(
        "# zscaler-dr-pacbuilder configuration\n\
         # Every section is optional; command-line flags take precedence.\n\n\
         {}",
        toml_str
    );

    std::fs::write(output, content)
        .with_context(|| format!("Failed to write config to {}", output.display()))?;

    info!("Generated config file: {}", output.display());
    println!("Configuration file generated: {}", output.display());

    Ok(())
}

fn validate_config(file: Option<&Path>) -> Result<()> {
    let path = file
        .map(Path::to_path_buf)
        .or_else(find_config_file)
        .context("No configuration file given or found")?;

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    config.validate().context("Configuration validation failed")?;

    println!("{} Configuration is valid", "✓".green());
    println!("  Allow list:   {}", config.paths.allow_list.display());
    println!("  Output:       {}", config.paths.output.display());
    println!(
        "  Deduplicate:  {}",
        if config.exclusions.enabled {
            config.exclusions.url.as_str()
        } else {
            "disabled"
        }
    );
    println!(
        "  Validation:   {}",
        if config.validation.enabled {
            config.validation.engine.as_str()
        } else {
            "disabled"
        }
    );
    println!("  Proxy:        {}", config.render.proxy);

    Ok(())
}

fn show_paths() -> Result<()> {
    println!("Configuration file search order:");
    println!();
    println!("  1. --config <FILE> or $PACBUILDER_CONFIG");
    println!("  2. ./{}", CONFIG_FILE_NAME);

    if let Some(path) = user_config_file() {
        println!("  3. {}", path.display());
    }

    Ok(())
}

fn user_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pacbuilder")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    user_config_file().filter(|path| path.exists())
}
