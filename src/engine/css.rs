//! Stylesheet post-processing with lightningcss.
//!
//! Runs on the compiler's CSS output:
//! 1. identical top-level `@media` blocks are merged and moved to the end
//! 2. vendor prefixes are added for the browserslist targets
//! 3. the sheet is printed, minified or pretty

use anyhow::{Result, anyhow};
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use lightningcss::traits::ToCss;

#[derive(Debug, Clone, Copy, Default)]
pub struct CssOptions {
    pub targets: Targets,
    pub group_media: bool,
    pub minify: bool,
}

/// Resolve browserslist queries. No queries means no prefixing.
pub fn resolve_targets(queries: &[String]) -> Result<Targets> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| anyhow!("invalid browserslist query `{}`: {e}", queries.join(", ")))?;
    Ok(browsers.map(Targets::from).unwrap_or_default())
}

/// Post-process compiled CSS.
pub fn process(source: &str, filename: &str, options: &CssOptions) -> Result<String> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_owned(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| anyhow!("{e}"))?;

    if options.group_media {
        group_media_queries(&mut stylesheet.rules.0);
    }

    stylesheet
        .minify(MinifyOptions {
            targets: options.targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            targets: options.targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    Ok(result.code)
}

/// Merge top-level `@media` rules with the same query, in order of first
/// appearance, after every other rule.
fn group_media_queries(rules: &mut Vec<CssRule<'_>>) {
    let mut groups: Vec<(String, CssRule<'_>)> = Vec::new();
    let mut rest = Vec::with_capacity(rules.len());

    for rule in rules.drain(..) {
        let CssRule::Media(media) = rule else {
            rest.push(rule);
            continue;
        };
        let key = media
            .query
            .to_css_string(PrinterOptions::default())
            .unwrap_or_default();

        match groups.iter().position(|(k, _)| *k == key) {
            Some(i) => {
                if let CssRule::Media(existing) = &mut groups[i].1 {
                    existing.rules.0.extend(media.rules.0);
                }
            }
            None => groups.push((key, CssRule::Media(media))),
        }
    }

    rest.extend(groups.into_iter().map(|(_, rule)| rule));
    *rules = rest;
}
