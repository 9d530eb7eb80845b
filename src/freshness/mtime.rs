//! Mtime-based freshness detection for built files.
//!
//! A destination is fresh when it exists and is not older than its source.
//! Content is never compared: a source rewritten without its mtime moving
//! forward is not detected.

use std::path::Path;
use std::time::SystemTime;

/// Outcome of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Force flag set, mtimes ignored
    Forced,
    /// Destination does not exist (or its mtime is unreadable)
    Missing,
    /// Source is newer than the destination
    Stale,
    /// Destination is up to date, skip
    Fresh,
}

impl Freshness {
    pub const fn needs_build(self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

/// Decide whether `source` must be transformed into `dest`.
///
/// Skipped iff `!force` and `mtime(dest) >= mtime(source)`. An unreadable
/// source mtime counts as stale.
pub fn check(source: &Path, dest: &Path, force: bool) -> Freshness {
    if force {
        return Freshness::Forced;
    }
    let Some(dest_time) = get_mtime(dest) else {
        return Freshness::Missing;
    };
    match get_mtime(source) {
        Some(source_time) if dest_time >= source_time => Freshness::Fresh,
        _ => Freshness::Stale,
    }
}

/// `None` if the file doesn't exist or mtime cannot be read
fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
