//! `savectl config` - inspect and create ~/.savectl/config.toml

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use savectl_core::SavectlConfig;

use super::client::{print_json, OutputFormat};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Show the effective config (file plus environment overrides)
    Show,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(format),
        ConfigCommands::Init(args) => run_init(args),
    }
}

fn run_path() -> Result<()> {
    let path = SavectlConfig::config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn run_show(format: OutputFormat) -> Result<()> {
    let config = SavectlConfig::load().context("Failed to load config")?;
    match format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Human | OutputFormat::Quiet => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    let path = SavectlConfig::config_path()?;

    if path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {}\n\nUse --force to overwrite",
            path.display()
        ));
    }

    SavectlConfig::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
