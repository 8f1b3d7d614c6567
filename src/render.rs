//! Chapter rendering: markdown in, templated HTML page out.
//!
//! Each chapter is converted to HTML once; the transformed body is written
//! into the shared header/footer template as a standalone page and reused
//! verbatim by the bundle assembler.

use crate::config::BookConfig;
use crate::templates::{INSERT_PLACEHOLDER, Templates, substitute_nav};
use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

/// `<ul>`/`<ol>` opening tags get a `list` class
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(ul|ol)>").unwrap());

/// Fenced code blocks are unwrapped to bare `<pre>`, dropping any
/// language-class annotation on the inner `<code>` element
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre><code[^>]*>(.*?)</code></pre>").unwrap());

/// Paragraphs containing only an image get an `img-container` class
static IMG_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p><img([^>]*)>[ \t\r\n]*</p>").unwrap());

/// The `%chapter_number%` token, with an optional trailing period
static CHAPTER_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%chapter_number%\.?").unwrap());

/// One rendered chapter, kept in memory for bundle assembly.
pub struct Chapter {
    /// Canonical short name derived from the source file name
    pub name: String,

    /// Transformed HTML body, shared by the page and both bundles
    pub body: String,
}

/// Render one chapter: write its standalone page and return the body.
///
/// `index` is the chapter's position in final processing order; it feeds the
/// `%chapter_number%` substitution. Exactly one file is written, to
/// `<output>/<shortname>.html`, overwriting any previous run's output.
pub fn render_chapter(
    path: &Path,
    index: usize,
    config: &BookConfig,
    templates: &Templates,
) -> Result<Chapter> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chapter: {}", path.display()))?;

    let body = postprocess(&markdown_to_html(&source), index);
    let name = short_name(path);

    let (prev, next) = config.nav_links(&name).unwrap_or(("", ""));
    let title = config
        .titles
        .get(&format!("{name}.md"))
        .unwrap_or(&config.book.title);

    // The download box is inserted on the index page only; every other page
    // gets the placeholder comment blanked out.
    let insert = if name == "index" {
        templates.index_insert.as_str()
    } else {
        ""
    };

    let header = substitute_nav(&templates.header, prev, next)
        .replace("{{title}}", title)
        .replace(INSERT_PLACEHOLDER, insert);
    let footer = substitute_nav(&templates.footer, prev, next);

    let out_path = config.build.output.join(format!("{name}.html"));
    fs::write(&out_path, format!("{header}{body}{footer}"))
        .with_context(|| format!("Failed to write page: {}", out_path.display()))?;

    Ok(Chapter { name, body })
}

/// Convert markdown source to HTML.
fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Apply the fixed set of textual transforms to the converted HTML.
///
/// Each transform is a global find-and-replace over the HTML string, not a
/// structural HTML rewrite. The order is fixed: lists, code blocks, image
/// paragraphs, chapter numbers.
fn postprocess(html: &str, index: usize) -> String {
    let html = LIST_RE.replace_all(html, r#"<$1 class="list">"#);
    let html = CODE_BLOCK_RE.replace_all(&html, "<pre>$1</pre>");
    let html = IMG_PARAGRAPH_RE.replace_all(&html, r#"<p class="img-container"><img$1></p>"#);
    CHAPTER_NUMBER_RE
        .replace_all(&html, format!("{index}.").as_str())
        .into_owned()
}

/// Canonical chapter short name: the file stem with any leading run of
/// non-lowercase-ASCII-letter characters stripped.
///
/// `01-intro.md` → `intro`, `index.md` → `index`.
pub fn short_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.trim_start_matches(|c: char| !c.is_ascii_lowercase())
        .to_string()
}
