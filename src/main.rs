//! Bookgen - a markdown book generator.
//!
//! Converts a directory of markdown chapters into linked HTML pages plus
//! single-page and ebook bundle variants.

mod build;
mod bundle;
mod cli;
mod collect;
mod config;
mod logger;
mod render;
mod templates;

use anyhow::{Result, bail};
use build::build_book;
use clap::Parser;
use cli::{Cli, Commands};
use config::BookConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static BookConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_book(config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<BookConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = BookConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
