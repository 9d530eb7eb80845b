//! SVG minification using usvg.
//!
//! usvg is built without text shaping, so `<text>` content would be lost in
//! the round trip. Such files are left alone.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::bytes::Regex;

/// Parse and re-serialize an SVG without indentation.
///
/// usvg resolves styles and drops editor metadata, so the output is usually
/// smaller than hand-exported files. `None` when the file carries text that
/// usvg cannot keep.
pub fn minify_svg(content: &[u8]) -> Result<Option<Vec<u8>>> {
    if has_text(content) {
        return Ok(None);
    }

    let tree = usvg::Tree::from_data(content, &usvg::Options::default())
        .context("Failed to parse SVG")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    Ok(Some(tree.to_string(&write_options).into_bytes()))
}

/// `<text>`, `<textPath>` or `<foreignObject>`, with or without a prefix.
fn has_text(content: &[u8]) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"<(?:[A-Za-z_][A-Za-z0-9_.-]*:)?(?:text|textPath|foreignObject)[ \t\r\n/>]")
            .expect("valid SVG text regex")
    });
    re.is_match(content)
}
