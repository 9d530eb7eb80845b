//! Source-to-destination path mapping.
//!
//! ```text
//! assets/_source/js/main.js     → assets/js/main.js
//!                   (minify)    → assets/js/main.min.js
//! assets/_source/style.scss     → assets/style.css
//! images/_high/banner.jpg       → images/banner.jpg
//! ```
//!
//! Every function here is pure: the same input always maps to the same
//! output, and nothing touches the filesystem.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("`{path}` is not inside a `{segment}` folder")]
    MissingSegment { path: PathBuf, segment: String },

    #[error("`{0}` has no file extension")]
    MissingExtension(PathBuf),

    #[error("`{path}` is not under `{base}`")]
    OutsideBase { path: PathBuf, base: PathBuf },
}

/// One file to transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub input: PathBuf,
    pub output: PathBuf,
    pub minify: bool,
    pub force: bool,
}

/// Remove the first path component equal to `segment`.
///
/// `segment` may carry trailing slashes (`"_source/"`).
pub fn strip_segment(path: &Path, segment: &str) -> Result<PathBuf, RouteError> {
    let name = segment.trim_matches('/');
    let mut found = false;
    let mut out = PathBuf::new();

    for component in path.components() {
        if !found && matches!(component, Component::Normal(c) if c == name) {
            found = true;
            continue;
        }
        out.push(component);
    }

    if found {
        Ok(out)
    } else {
        Err(RouteError::MissingSegment {
            path: path.to_path_buf(),
            segment: name.to_owned(),
        })
    }
}

/// Replace the extension of `path` with `ext`.
pub fn with_extension(path: &Path, ext: &str) -> Result<PathBuf, RouteError> {
    if path.extension().is_none() {
        return Err(RouteError::MissingExtension(path.to_path_buf()));
    }
    Ok(path.with_extension(ext))
}

/// Insert `.min` before the extension: `main.js` → `main.min.js`.
///
/// Unconditional, so the minified and plain outputs of one source never
/// collide: `lib.min.js` → `lib.min.min.js`.
pub fn min_infix(path: &Path) -> Result<PathBuf, RouteError> {
    let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
        return Err(RouteError::MissingExtension(path.to_path_buf()));
    };
    let mut name = OsString::from(stem);
    name.push(".min.");
    name.push(ext);
    Ok(path.with_file_name(name))
}

/// Move `path` from under `from` to the same relative place under `to`.
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Result<PathBuf, RouteError> {
    path.strip_prefix(from)
        .map(|rel| to.join(rel))
        .map_err(|_| RouteError::OutsideBase {
            path: path.to_path_buf(),
            base: from.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_segment() {
        assert_eq!(
            strip_segment(Path::new("assets/_source/js/main.js"), "_source/").unwrap(),
            PathBuf::from("assets/js/main.js")
        );
        assert_eq!(
            strip_segment(Path::new("images/_high/banner.jpg"), "_high").unwrap(),
            PathBuf::from("images/banner.jpg")
        );
    }

    #[test]
    fn test_strip_segment_first_occurrence_only() {
        assert_eq!(
            strip_segment(Path::new("a/_source/b/_source/c.js"), "_source").unwrap(),
            PathBuf::from("a/b/_source/c.js")
        );
    }

    #[test]
    fn test_strip_segment_missing() {
        let err = strip_segment(Path::new("assets/js/main.js"), "_source/").unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingSegment {
                path: PathBuf::from("assets/js/main.js"),
                segment: "_source".into(),
            }
        );
    }

    #[test]
    fn test_strip_segment_requires_whole_component() {
        assert!(strip_segment(Path::new("assets/my_source/a.js"), "_source").is_err());
    }

    #[test]
    fn test_min_infix() {
        assert_eq!(
            min_infix(Path::new("assets/js/main.js")).unwrap(),
            PathBuf::from("assets/js/main.min.js")
        );
        assert_eq!(
            min_infix(Path::new("assets/style.css")).unwrap(),
            PathBuf::from("assets/style.min.css")
        );
        assert_eq!(
            min_infix(Path::new("lib.min.js")).unwrap(),
            PathBuf::from("lib.min.min.js")
        );
        assert!(min_infix(Path::new("Makefile")).is_err());
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(
            with_extension(Path::new("assets/style.scss"), "css").unwrap(),
            PathBuf::from("assets/style.css")
        );
        assert!(with_extension(Path::new("assets/style"), "css").is_err());
    }

    #[test]
    fn test_rebase() {
        assert_eq!(
            rebase(
                Path::new("/p/node_modules/jquery/dist/jquery.js"),
                Path::new("/p/node_modules/jquery/dist"),
                Path::new("/p/vendor/jquery")
            )
            .unwrap(),
            PathBuf::from("/p/vendor/jquery/jquery.js")
        );
        assert!(rebase(Path::new("/x/a.js"), Path::new("/p"), Path::new("/q")).is_err());
    }
}
