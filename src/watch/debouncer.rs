//! Event coalescing for the watch loop.
//!
//! Editors emit bursts (truncate, write, rename) for a single save. Events
//! are collected per path until no new event arrived for [`DEBOUNCE_MS`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::ModifyKind;
use rustc_hash::FxHashMap;

use crate::debug;
use crate::utils::path::normalize_path;

pub(super) const DEBOUNCE_MS: u64 = 200;

/// What happened to a path within one burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

pub(super) struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
        }
    }

    pub(super) fn add_event(&mut self, event: &notify::Event) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            // mtime/chmod noise, including our own writes to outputs
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in event.paths.iter().filter(|p| !is_editor_artifact(p)) {
            let path = normalize_path(path);
            match (self.changes.get(&path).copied(), kind) {
                // appeared and vanished within the burst
                (Some(ChangeKind::Created), ChangeKind::Removed) => {
                    self.changes.remove(&path);
                }
                // a new file stays "created" while it is being written
                (Some(ChangeKind::Created), ChangeKind::Modified) => {}
                _ => {
                    debug!("watch"; "{}: {}", kind.label(), path.display());
                    self.changes.insert(path, kind);
                }
            }
            self.last_event = Some(Instant::now());
        }
    }

    /// Collected changes, once the burst is over.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        let last_event = self.last_event?;
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return None;
        }
        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);
        (!changes.is_empty()).then_some(changes)
    }

    /// Time until the current burst can be taken.
    pub(super) fn sleep_duration(&self) -> Duration {
        match self.last_event {
            Some(last_event) => Duration::from_millis(DEBOUNCE_MS)
                .saturating_sub(last_event.elapsed())
                .max(Duration::from_millis(1)),
            None => Duration::from_secs(86400),
        }
    }
}

/// Swap files, backups and other hidden editor files.
fn is_editor_artifact(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
        || name.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use notify::Event;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn modified(path: &str) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path)
    }

    fn force_ready(debouncer: &mut Debouncer) {
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 10));
    }

    #[test]
    fn test_not_ready_within_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&modified("/site/assets/_source/style.scss"));
        assert!(debouncer.take_if_ready().is_none());
        assert!(debouncer.sleep_duration() <= Duration::from_millis(DEBOUNCE_MS));
    }

    #[test]
    fn test_burst_coalesced() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&modified("/site/assets/_source/style.scss"));
        debouncer.add_event(&modified("/site/assets/_source/style.scss"));
        debouncer.add_event(&modified("/site/assets/_source/_vars.scss"));
        force_ready(&mut debouncer);

        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes.len(), 2);
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_created_then_removed_discarded() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&event(EventKind::Create(CreateKind::File), "/site/a.js"));
        debouncer.add_event(&modified("/site/a.js"));
        debouncer.add_event(&event(EventKind::Remove(RemoveKind::File), "/site/a.js"));
        force_ready(&mut debouncer);
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_modified_then_removed() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&modified("/site/a.js"));
        debouncer.add_event(&event(EventKind::Remove(RemoveKind::File), "/site/a.js"));
        force_ready(&mut debouncer);
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes[Path::new("/site/a.js")], ChangeKind::Removed);
    }

    #[test]
    fn test_ignored_events() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            "/site/a.js",
        ));
        debouncer.add_event(&modified("/site/.style.scss.swp"));
        debouncer.add_event(&modified("/site/style.scss~"));
        assert!(debouncer.last_event.is_none());
        assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
    }
}
