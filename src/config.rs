//! Book configuration management.
//!
//! Handles loading, parsing, and validating the `bookgen.toml` configuration
//! file, and derives prev/next navigation from the ordered chapter manifest.

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub fn r#false() -> bool {
        false
    }

    pub mod book {
        pub fn title() -> String {
            "Distributed systems for fun and profit".into()
        }

        pub fn chapters() -> Vec<String> {
            [
                "index",
                "intro",
                "abstractions",
                "time",
                "replication",
                "eventual",
                "appendix",
            ]
            .map(String::from)
            .to_vec()
        }
    }

    pub mod build {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn input() -> PathBuf {
            "input".into()
        }
        pub fn output() -> PathBuf {
            "output".into()
        }
        pub fn layout() -> PathBuf {
            "layouts/default".into()
        }
        pub fn index() -> String {
            "index.md".into()
        }
    }
}

/// File ordering mode applied before the index file is pinned first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    /// Sort the input list lexicographically by path
    Sort,
    /// Keep the order the input list was given in (default)
    #[default]
    Given,
}

/// `[book]` section in bookgen.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BookSection {
    /// Fallback page title used when a chapter has no `[titles]` entry
    #[serde(default = "config_defaults::book::title")]
    #[educe(Default = config_defaults::book::title())]
    pub title: String,

    /// Ordered chapter manifest: short names in reading order.
    /// Drives both prev/next navigation and bundle link rewriting.
    #[serde(default = "config_defaults::book::chapters")]
    #[educe(Default = config_defaults::book::chapters())]
    pub chapters: Vec<String>,
}

#[test]
fn validate_book_section() {
    let config = r#"
        [book]
        title = "My Book"
        chapters = ["index", "one", "two"]
    "#;
    let config: BookConfig = toml::from_str(config).unwrap();

    assert_eq!(config.book.title, "My Book");
    assert_eq!(config.book.chapters, vec!["index", "one", "two"]);
}

#[test]
fn test_book_section_defaults() {
    let config: BookConfig = toml::from_str("").unwrap();

    assert_eq!(config.book.title, "Distributed systems for fun and profit");
    assert_eq!(
        config.book.chapters,
        vec![
            "index",
            "intro",
            "abstractions",
            "time",
            "replication",
            "eventual",
            "appendix"
        ]
    );
}

/// `[build]` section in bookgen.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    /// Root directory path
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Input directory containing markdown chapter files (relative to root)
    #[serde(default = "config_defaults::build::input")]
    #[educe(Default = config_defaults::build::input())]
    pub input: PathBuf,

    /// Explicit ordered list of chapter files.
    /// When set, directory enumeration is skipped entirely.
    #[serde(default)]
    pub files: Option<Vec<PathBuf>>,

    /// Output directory path (relative to root)
    #[serde(default = "config_defaults::build::output")]
    #[educe(Default = config_defaults::build::output())]
    pub output: PathBuf,

    /// Layout directory holding header/footer templates and insert fragments
    #[serde(default = "config_defaults::build::layout")]
    #[educe(Default = config_defaults::build::layout())]
    pub layout: PathBuf,

    /// Input file ordering mode
    #[serde(default)]
    pub order: OrderMode,

    /// Designated index file name, always pinned to processing position 0
    #[serde(default = "config_defaults::build::index")]
    #[educe(Default = config_defaults::build::index())]
    pub index: String,

    /// Clear output directory before building
    #[serde(default = "config_defaults::r#false")]
    #[educe(Default = config_defaults::r#false())]
    pub clean: bool,
}

#[test]
fn test_build_section_defaults() {
    let config: BookConfig = toml::from_str("").unwrap();

    assert_eq!(config.build.input, PathBuf::from("input"));
    assert_eq!(config.build.output, PathBuf::from("output"));
    assert_eq!(config.build.layout, PathBuf::from("layouts/default"));
    assert_eq!(config.build.index, "index.md");
    assert_eq!(config.build.order, OrderMode::Given);
    assert!(config.build.files.is_none());
    assert!(!config.build.clean);
}

#[test]
fn test_order_mode_parsing() {
    let config = r#"
        [build]
        order = "sort"
    "#;
    let config: BookConfig = toml::from_str(config).unwrap();
    assert_eq!(config.build.order, OrderMode::Sort);

    let config = r#"
        [build]
        order = "given"
    "#;
    let config: BookConfig = toml::from_str(config).unwrap();
    assert_eq!(config.build.order, OrderMode::Given);
}

#[test]
fn test_explicit_file_list() {
    let config = r#"
        [build]
        files = ["input/index.md", "input/01-intro.md"]
    "#;
    let config: BookConfig = toml::from_str(config).unwrap();

    assert_eq!(
        config.build.files,
        Some(vec![
            PathBuf::from("input/index.md"),
            PathBuf::from("input/01-intro.md")
        ])
    );
}

#[test]
fn test_titles_mapping() {
    let config = r#"
        [titles]
        "intro.md" = "1. Basics"
        "time.md" = "3. Time and order"
    "#;
    let config: BookConfig = toml::from_str(config).unwrap();

    assert_eq!(config.titles.get("intro.md").unwrap(), "1. Basics");
    assert_eq!(config.titles.get("time.md").unwrap(), "3. Time and order");
}

#[test]
fn test_unknown_field_rejection_in_build() {
    let config = r#"
        [build]
        unknown_field = "should_fail"
    "#;
    let result: Result<BookConfig, _> = toml::from_str(config);

    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("unknown field"));
}

/// Root configuration structure representing bookgen.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BookConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Book-level settings and the chapter manifest
    #[serde(default)]
    pub book: BookSection,

    /// Build settings
    #[serde(default)]
    pub build: BuildSection,

    /// Page titles keyed by source filename, e.g. `"intro.md"`
    #[serde(default)]
    pub titles: HashMap<String, String>,
}

impl BookConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: BookConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Previous/next chapter short names derived from manifest position.
    ///
    /// The sequence is clamped at both ends: the first chapter's prev and the
    /// last chapter's next point back at themselves. Returns `None` for a
    /// short name outside the manifest (the page then gets empty links).
    pub fn nav_links(&self, short_name: &str) -> Option<(&str, &str)> {
        let chapters = &self.book.chapters;
        let pos = chapters.iter().position(|c| c == short_name)?;

        let prev = &chapters[pos.saturating_sub(1)];
        let next = &chapters[(pos + 1).min(chapters.len() - 1)];
        Some((prev, next))
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli.root.clone().unwrap_or_else(|| self.get_root().to_owned());
        self.set_root(&root);

        Self::update_option(&mut self.build.input, cli.input.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.build.layout, cli.layout.as_ref());

        let Commands::Build { build_args } = &cli.command;
        if build_args.clean {
            self.build.clean = true;
        }
        Self::update_option(&mut self.build.order, build_args.order.as_ref());

        self.build.input = root.join(&self.build.input);
        self.build.output = root.join(&self.build.output);
        self.build.layout = root.join(&self.build.layout);
        if let Some(files) = self.build.files.as_mut() {
            for file in files.iter_mut() {
                *file = root.join(&*file);
            }
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration before building
    pub fn validate(&self) -> Result<()> {
        if self.build.files.is_none() && !self.build.input.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.input] is not a directory: {}",
                self.build.input.display()
            )));
        }

        if !self.build.layout.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.layout] is not a directory: {}",
                self.build.layout.display()
            )));
        }

        if self.build.index.is_empty() {
            bail!(ConfigError::Validation(
                "[build.index] must not be empty".into()
            ));
        }

        Ok(())
    }
}
