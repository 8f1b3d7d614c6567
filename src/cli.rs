//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::config::OrderMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookgen markdown book generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input directory containing markdown chapters (relative to project root)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Layout directory containing the templates (relative to project root)
    #[arg(short, long)]
    pub layout: Option<PathBuf>,

    /// Config file name (default: bookgen.toml)
    #[arg(short = 'C', long, default_value = "bookgen.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Input file ordering mode applied before the index file is pinned first
    #[arg(long, value_enum)]
    pub order: Option<OrderMode>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render every chapter page plus the single-page and ebook bundles
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}
