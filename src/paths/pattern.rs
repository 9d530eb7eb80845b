//! Ordered glob pattern lists.
//!
//! A [`SourceSet`] is a literal base directory plus a list of inclusive and
//! negated (`!`-prefixed) patterns relative to it, evaluated in order. A
//! negated pattern only removes matches from the inclusive patterns listed
//! *after* it:
//!
//! ```text
//! ["!**/_*.scss", "**/*.scss"]   partials excluded
//! ["**/*.scss", "!**/_*.scss"]   partials matched by the first entry
//! ```
//!
//! Supported syntax: `*`, `**`, `?`, `[...]` and `{a,b}` alternation, which
//! is expanded before matching. The base is a plain path and is never parsed
//! as a glob, so folders named `site{v2}` or `[draft]` are safe.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlobError {
    #[error("invalid glob pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("unbalanced braces in glob pattern `{0}`")]
    UnbalancedBrace(String),
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One entry of a [`SourceSet`].
#[derive(Debug, Clone)]
struct GlobEntry {
    negated: bool,
    /// Brace-expanded alternatives.
    alternatives: Vec<Pattern>,
}

impl GlobEntry {
    fn parse(pattern: &str) -> Result<Self, GlobError> {
        let (negated, raw) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };

        let alternatives = expand_braces(raw)?
            .iter()
            .map(|alt| {
                Pattern::new(alt).map_err(|source| GlobError::Pattern {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            negated,
            alternatives,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        self.alternatives
            .iter()
            .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
    }
}

/// Ordered list of inclusive and negated glob patterns below one base.
#[derive(Debug, Clone)]
pub struct SourceSet {
    base: PathBuf,
    entries: Vec<GlobEntry>,
}

impl SourceSet {
    /// `patterns` are relative to `base`.
    pub fn new<S: AsRef<str>>(base: &Path, patterns: &[S]) -> Result<Self, GlobError> {
        let entries = patterns
            .iter()
            .map(|p| GlobEntry::parse(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            base: base.to_path_buf(),
            entries,
        })
    }

    /// Whether `path` is selected.
    ///
    /// True when `path` lies under the base, some inclusive pattern matches
    /// and no negated pattern listed before it matches.
    pub fn matches(&self, path: &Path) -> bool {
        let Ok(path) = path.strip_prefix(&self.base) else {
            return false;
        };
        let mut blocked = false;
        for entry in &self.entries {
            if entry.negated {
                blocked |= entry.matches(path);
            } else if !blocked && entry.matches(path) {
                return true;
            }
        }
        false
    }

    /// The same set with every negation dropped.
    ///
    /// Watchers use this so a change to an excluded partial still
    /// re-triggers the group that imports it.
    pub fn inclusive(&self) -> Self {
        Self {
            base: self.base.clone(),
            entries: self
                .entries
                .iter()
                .filter(|e| !e.negated)
                .cloned()
                .collect(),
        }
    }

    /// Literal directories that inclusive patterns start from.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut seen = FxHashSet::default();
        self.entries
            .iter()
            .filter(|e| !e.negated)
            .flat_map(|e| e.alternatives.iter().map(|p| literal_base(p.as_str())))
            .map(|rel| {
                if rel.as_os_str().is_empty() {
                    self.base.clone()
                } else {
                    self.base.join(rel)
                }
            })
            .filter(|root| seen.insert(root.clone()))
            .collect()
    }

    /// Walk the literal roots and return every selected file, sorted.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut seen = FxHashSet::default();
        let mut files: Vec<PathBuf> = self
            .roots()
            .iter()
            .filter(|root| root.is_dir())
            .flat_map(|root| {
                WalkDir::new(root)
                    .skip_hidden(false)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.path())
            })
            .filter(|path| self.matches(path))
            .filter(|path| seen.insert(path.clone()))
            .collect();
        files.sort();
        files
    }
}

/// Expand `{a,b}` alternation. Nested groups are expanded recursively.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, GlobError> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err(GlobError::UnbalancedBrace(pattern.to_owned()));
        }
        return Ok(vec![pattern.to_owned()]);
    };

    // Find the matching close brace and top-level commas.
    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| GlobError::UnbalancedBrace(pattern.to_owned()))?;

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(&splits);
    bounds.push(close);

    let mut out = Vec::new();
    for pair in bounds.windows(2) {
        let option = &pattern[pair[0] + 1..pair[1]];
        for expanded in expand_braces(&format!("{prefix}{option}{suffix}"))? {
            if !out.contains(&expanded) {
                out.push(expanded);
            }
        }
    }
    Ok(out)
}

/// Split a user glob into its literal leading folder and the rest:
/// `node_modules/jquery/dist/**/*.js` → (`node_modules/jquery/dist`, `**/*.js`).
pub fn split_glob(pattern: &str) -> (PathBuf, String) {
    let mut base = PathBuf::new();
    let mut components = Path::new(pattern).components().peekable();
    while let Some(component) = components.next() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[', '{']) || components.peek().is_none() {
            let rest: PathBuf = std::iter::once(component).chain(components).collect();
            return (base, rest.to_string_lossy().into_owned());
        }
        base.push(component);
    }
    (base, String::new())
}

/// Leading path components without glob metacharacters.
fn literal_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[', '{']) {
            break;
        }
        base.push(component);
    }
    // A pattern naming a single file walks its parent.
    if base.as_os_str() == pattern {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("*.js").unwrap(), vec!["*.js"]);
        assert_eq!(expand_braces("*.{jpg,png}").unwrap(), vec!["*.jpg", "*.png"]);
        assert_eq!(
            expand_braces("{a,b}/*.{x,y}").unwrap(),
            vec!["a/*.x", "a/*.y", "b/*.x", "b/*.y"]
        );
        assert_eq!(
            expand_braces("*.{svg,{jpg,jpeg}}").unwrap(),
            vec!["*.svg", "*.jpg", "*.jpeg"]
        );
    }

    #[test]
    fn test_expand_braces_unbalanced() {
        assert!(matches!(expand_braces("*.{jpg"), Err(GlobError::UnbalancedBrace(_))));
        assert!(matches!(expand_braces("*.jpg}"), Err(GlobError::UnbalancedBrace(_))));
    }

    fn set(base: &str, patterns: &[&str]) -> SourceSet {
        SourceSet::new(Path::new(base), patterns).unwrap()
    }

    #[test]
    fn test_invalid_pattern() {
        let err = SourceSet::new(Path::new("/s"), &["src/[*.js"]).unwrap_err();
        assert!(matches!(err, GlobError::Pattern { .. }));
    }

    #[test]
    fn test_negation_before_inclusive_excludes() {
        let set = set("/s", &["!**/_*.scss", "**/*.scss"]);
        assert!(set.matches(Path::new("/s/style.scss")));
        assert!(set.matches(Path::new("/s/blocks/header.scss")));
        assert!(!set.matches(Path::new("/s/_vars.scss")));
        assert!(!set.matches(Path::new("/s/blocks/_mixins.scss")));
    }

    #[test]
    fn test_inverted_order_readmits_partials() {
        let set = set("/s", &["**/*.scss", "!**/_*.scss"]);
        assert!(set.matches(Path::new("/s/_vars.scss")));
        assert!(set.matches(Path::new("/s/blocks/_mixins.scss")));
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let set = set("/s", &["*.js"]);
        assert!(set.matches(Path::new("/s/main.js")));
        assert!(!set.matches(Path::new("/s/lib/main.js")));
        assert!(!set.matches(Path::new("/other/main.js")));
    }

    #[test]
    fn test_inclusive_drops_negations() {
        let set = set("/s", &["!**/_*.scss", "**/*.scss"]);
        assert!(!set.matches(Path::new("/s/_vars.scss")));
        let watch = set.inclusive();
        assert!(watch.matches(Path::new("/s/_vars.scss")));
        assert!(watch.matches(Path::new("/s/style.scss")));
    }

    #[test]
    fn test_roots() {
        let set = set("/a", &["!_source/**/_*.js", "_source/**/*.js", "b/*.{js,mjs}"]);
        assert_eq!(set.roots(), vec![PathBuf::from("/a/_source"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_literal_base_of_plain_file() {
        assert_eq!(literal_base("/a/b/file.js"), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_split_glob() {
        assert_eq!(
            split_glob("node_modules/jquery/dist/**/*.*"),
            (PathBuf::from("node_modules/jquery/dist"), "**/*.*".to_owned())
        );
        assert_eq!(
            split_glob("/p/a/b/*.{js,css}"),
            (PathBuf::from("/p/a/b"), "*.{js,css}".to_owned())
        );
        assert_eq!(split_glob("lib/file.js"), (PathBuf::from("lib"), "file.js".to_owned()));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let main = touch(root, "_source/main.js");
        let nested = touch(root, "_source/lib/util.js");
        touch(root, "_source/_partial.js");
        touch(root, "_source/readme.md");

        let set = SourceSet::new(&root.join("_source"), &["!**/_*.js", "**/*.js"]).unwrap();

        assert_eq!(set.discover(), vec![nested, main]);
    }

    #[test]
    fn test_glob_characters_in_base_are_literal() {
        let dir = TempDir::new().unwrap();
        for folder in ["site{v2}", "site[draft]"] {
            let base = dir.path().join(folder).join("_source");
            let main = touch(&base, "main.js");

            let set = SourceSet::new(&base, &["**/*.js"]).unwrap();
            assert_eq!(set.roots(), vec![base.clone()]);
            assert_eq!(set.discover(), vec![main]);
        }
    }

    #[test]
    fn test_discover_missing_root() {
        let set = set("/definitely/not/here", &["**/*.js"]);
        assert!(set.discover().is_empty());
    }
}
