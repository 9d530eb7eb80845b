//! Filesystem path helpers.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `write_output` - write a built file, creating parent folders
//! - `relative_display` - short path for log lines

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// For paths that do not exist yet, falls back to:
/// - Join with current directory if relative
/// - Drop `.` and fold `..` lexically
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        };
        clean_lexically(&absolute)
    })
}

fn clean_lexically(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Write `contents` to `path`, creating parent folders as needed.
pub fn write_output(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create `{}`", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write `{}`", path.display()))
}

/// `path` relative to `base` when it lies inside it, for log output.
pub fn relative_display<'a>(path: &'a Path, base: &Path) -> Cow<'a, str> {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
}
