//! Bundle assembly: the single-page and ebook variants.
//!
//! Both bundles concatenate every rendered chapter body into one document,
//! each chapter prefixed with a named anchor so that the per-chapter links
//! rewritten by [`combine`] keep working inside a single page.

use crate::config::BookConfig;
use crate::render::Chapter;
use crate::templates::{INSERT_PLACEHOLDER, Templates, substitute_nav};
use anyhow::{Context, Result};
use regex::Regex;
use std::{fs, sync::LazyLock};

/// Separator between chapters in the combined documents.
const PAGE_BREAK: &str = r#"<div style="page-break-after: always;"></div>"#;

/// Script tag removed from the ebook header.
const QUOTE_COLORS_SCRIPT: &str =
    r#"<script type="text/javascript" src="assets/quote_colors.js"></script>"#;

/// Stylesheet link inserted into the ebook header before `</head>`.
const EBOOK_STYLESHEET: &str =
    r#"<link type="text/css" rel="stylesheet" href="assets/ebook.css"/>"#;

/// `<link ...>` tags, all stripped from the ebook header
static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<link[^>]+>").unwrap());

/// Write `single-page.html` and `ebook.html` from the rendered chapters.
///
/// Both variants force the `{{prev}}`/`{{next}}` navigation back to the
/// index page. Any write error aborts the run.
pub fn write_bundles(
    chapters: &[Chapter],
    config: &BookConfig,
    templates: &Templates,
) -> Result<()> {
    let body = combine(chapters, config);
    let footer = substitute_nav(&templates.footer, "index", "index");

    let single_header = substitute_nav(&templates.header, "index", "index")
        .replace("assets/style.css", "assets/printable.css")
        .replace(INSERT_PLACEHOLDER, &templates.single_insert);
    write_bundle(config, "single-page.html", &single_header, &body, &footer)?;

    let ebook_header = LINK_TAG_RE.replace_all(&templates.header, "");
    let ebook_header = substitute_nav(&ebook_header, "index", "index")
        .replace(QUOTE_COLORS_SCRIPT, "")
        .replace("</head>", &format!("{EBOOK_STYLESHEET}</head>"));
    write_bundle(config, "ebook.html", &ebook_header, &body, &footer)?;

    Ok(())
}

/// Concatenate anchor-prefixed chapter bodies and rewrite internal links.
///
/// Every `href="<name>.html"` whose short name appears in the chapter
/// manifest becomes a same-document `href="#<name>"`. Hrefs outside the
/// manifest are left untouched (dangling in a single-document context, a
/// known limitation of the format).
fn combine(chapters: &[Chapter], config: &BookConfig) -> String {
    let mut full = chapters
        .iter()
        .map(|c| format!(r#"<a name="{}"></a>{}"#, c.name, c.body))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK);

    for name in &config.book.chapters {
        full = full.replace(
            &format!(r#"href="{name}.html""#),
            &format!(r##"href="#{name}""##),
        );
    }
    full
}

fn write_bundle(
    config: &BookConfig,
    name: &str,
    header: &str,
    body: &str,
    footer: &str,
) -> Result<()> {
    let path = config.build.output.join(name);
    fs::write(&path, format!("{header}{body}{footer}"))
        .with_context(|| format!("Failed to write bundle: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chapter(name: &str, body: &str) -> Chapter {
        Chapter {
            name: name.into(),
            body: body.into(),
        }
    }

    fn templates() -> Templates {
        Templates {
            header: concat!(
                r#"<head><title>{{title}}</title>"#,
                r#"<link rel="stylesheet" href="assets/style.css">"#,
                r#"<script type="text/javascript" src="assets/quote_colors.js"></script>"#,
                r#"</head><body><!-- index-insert -->"#,
                r#"<a href="{{prev}}">p</a><a href="{{next}}">n</a>"#,
            )
            .into(),
            footer: r#"<a href="{{prev}}">p</a><a href="{{next}}">n</a></body>"#.into(),
            index_insert: r#"<div class="download"></div>"#.into(),
            single_insert: r#"<div class="single"></div>"#.into(),
        }
    }

    #[test]
    fn test_combine_prefixes_anchors_in_order() {
        let config = BookConfig::default();
        let chapters = [chapter("index", "<p>i</p>"), chapter("intro", "<p>n</p>")];

        let out = combine(&chapters, &config);
        let index_pos = out.find(r#"<a name="index"></a>"#).unwrap();
        let intro_pos = out.find(r#"<a name="intro"></a>"#).unwrap();
        assert!(index_pos < intro_pos);
        assert!(out.contains(PAGE_BREAK));
    }

    #[test]
    fn test_combine_rewrites_manifest_links() {
        let config = BookConfig::default();
        let chapters = [chapter(
            "index",
            r#"<a href="time.html">t</a> and again <a href="time.html">t</a>"#,
        )];

        let out = combine(&chapters, &config);
        assert_eq!(out.matches(r##"href="#time""##).count(), 2);
        assert!(!out.contains(r#"href="time.html""#));
    }

    #[test]
    fn test_combine_leaves_unknown_links_alone() {
        let config = BookConfig::default();
        let chapters = [chapter("index", r#"<a href="elsewhere.html">x</a>"#)];

        let out = combine(&chapters, &config);
        assert!(out.contains(r#"href="elsewhere.html""#));
    }

    #[test]
    fn test_single_page_variant() {
        let out_dir = tempdir().unwrap();
        let mut config = BookConfig::default();
        config.build.output = out_dir.path().to_path_buf();

        let chapters = [chapter("index", "<p>i</p>"), chapter("intro", "<p>n</p>")];
        write_bundles(&chapters, &config, &templates()).unwrap();

        let single =
            std::fs::read_to_string(out_dir.path().join("single-page.html")).unwrap();
        assert!(single.contains("assets/printable.css"));
        assert!(!single.contains("assets/style.css"));
        assert!(single.contains(r#"<div class="single"></div>"#));
        // Navigation on both ends points back at the index page
        assert_eq!(single.matches(r#"<a href="index.html">p</a>"#).count(), 2);
    }

    #[test]
    fn test_ebook_variant_strips_links_and_script() {
        let out_dir = tempdir().unwrap();
        let mut config = BookConfig::default();
        config.build.output = out_dir.path().to_path_buf();

        write_bundles(&[chapter("index", "<p>i</p>")], &config, &templates()).unwrap();

        let ebook = std::fs::read_to_string(out_dir.path().join("ebook.html")).unwrap();
        assert!(!ebook.contains("assets/style.css"));
        assert!(!ebook.contains("quote_colors.js"));
        assert!(ebook.contains(&format!("{EBOOK_STYLESHEET}</head>")));
        // The index-insert placeholder is only consumed by the single-page variant
        assert!(ebook.contains(INSERT_PLACEHOLDER));
    }
}
