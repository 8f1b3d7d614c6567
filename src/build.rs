//! Book building orchestration.
//!
//! Sequential pipeline: collect chapter files, render one page per chapter,
//! assemble the two bundle variants.
//!
//! # Architecture
//!
//! ```text
//! build_book()
//!     │
//!     ├── prepare_output() ──► ensure (optionally clear) output dir
//!     │
//!     ├── Templates::load() ──► header/footer/insert fragments
//!     │
//!     ├── collect_files() ──► ordered chapter paths (index pinned first)
//!     │
//!     ├── render_chapter() per file ──► write <shortname>.html,
//!     │                                 keep body for the bundles
//!     │
//!     └── write_bundles() ──► single-page.html + ebook.html
//! ```

use crate::{
    bundle::write_bundles,
    collect::collect_files,
    config::BookConfig,
    log,
    render::render_chapter,
    templates::Templates,
};
use anyhow::{Context, Result};
use std::fs;

/// Build the whole book: one HTML page per chapter plus the two bundles.
///
/// The pipeline is fully synchronous; every write has completed when this
/// returns. Zero collected chapters is not an error, the bundles then
/// contain only the template header and footer.
pub fn build_book(config: &BookConfig) -> Result<()> {
    prepare_output(config)?;
    let templates = Templates::load(&config.build.layout)?;

    let files = collect_files(config)?;
    log!("collect"; "found {} chapters", files.len());

    let mut chapters = Vec::with_capacity(files.len());
    for (index, path) in files.iter().enumerate() {
        log!("render"; "{}", path.display());
        chapters.push(render_chapter(path, index, config, &templates)?);
    }

    write_bundles(&chapters, config, &templates)?;
    log!("bundle"; "single-page.html + ebook.html");
    log!("build"; "done");

    Ok(())
}

/// Ensure the output directory exists, clearing it first when requested.
fn prepare_output(config: &BookConfig) -> Result<()> {
    let output = &config.build.output;

    if config.build.clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output).with_context(|| {
        format!("Failed to create output directory: {}", output.display())
    })?;

    Ok(())
}
