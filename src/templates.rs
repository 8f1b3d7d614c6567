//! Template loading and literal-token substitution.
//!
//! The layout directory provides four static fragments, loaded once per run
//! and read-only afterwards: `header.html`, `footer.html`,
//! `index-insert.html` and `single-insert.html`.
//!
//! Substitution is plain substring replacement of `{{title}}`, `{{prev}}`,
//! `{{next}}` and the `<!-- index-insert -->` comment placeholder. A token
//! missing from a template is a silent no-op, not an error.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Placeholder comment replaced by the index/single-page insert fragments.
pub const INSERT_PLACEHOLDER: &str = "<!-- index-insert -->";

/// Static template fragments loaded from the layout directory.
pub struct Templates {
    /// Shared page header carrying the `{{title}}`/`{{prev}}`/`{{next}}` tokens
    pub header: String,

    /// Shared page footer carrying the `{{prev}}`/`{{next}}` tokens
    pub footer: String,

    /// Fragment substituted into the header of the index page only
    pub index_insert: String,

    /// Fragment substituted into the header of the single-page bundle
    pub single_insert: String,
}

impl Templates {
    /// Load all template fragments from the layout directory.
    ///
    /// A missing fragment file is fatal.
    pub fn load(layout: &Path) -> Result<Self> {
        Ok(Self {
            header: read_fragment(layout, "header.html")?,
            footer: read_fragment(layout, "footer.html")?,
            index_insert: read_fragment(layout, "index-insert.html")?,
            single_insert: read_fragment(layout, "single-insert.html")?,
        })
    }
}

fn read_fragment(layout: &Path, name: &str) -> Result<String> {
    let path = layout.join(name);
    fs::read_to_string(&path)
        .with_context(|| format!("Failed to read template: {}", path.display()))
}

/// Substitute the `{{prev}}`/`{{next}}` navigation tokens.
///
/// Chapter names are rendered as `<name>.html`; an empty name renders as an
/// empty string, so a chapter outside the manifest gets no links.
pub fn substitute_nav(template: &str, prev: &str, next: &str) -> String {
    template
        .replace("{{prev}}", &page_href(prev))
        .replace("{{next}}", &page_href(next))
}

/// `"intro"` → `"intro.html"`; empty stays empty.
fn page_href(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{name}.html")
    }
}
