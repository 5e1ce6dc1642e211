use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

pub(super) const DEBOUNCE_MS: u64 = 200;

/// Collapses bursts of notify events for one file into a single change.
///
/// Editors often save through a temp file and a rename, so the watch is on
/// the parent directory and events are matched by file name.
pub(super) struct Debouncer {
    file_name: PathBuf,
    pub(super) changes: FxHashSet<PathBuf>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(target: &Path) -> Self {
        Self {
            file_name: target.file_name().map(PathBuf::from).unwrap_or_default(),
            changes: FxHashSet::default(),
            last_event: None,
        }
    }

    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            // Metadata-only changes (mtime/chmod) are not edits.
            EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) || path.file_name() != Some(self.file_name.as_os_str()) {
                continue;
            }
            crate::debug!("watch"; "event {:?}: {}", event.kind, path.display());
            self.changes.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    /// Take pending changes once the debounce window has passed.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        let changes: Vec<_> = self.changes.drain().collect();
        (!changes.is_empty()).then_some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= Duration::from_millis(DEBOUNCE_MS) && !self.changes.is_empty()
    }

    /// Time left until the pending changes are ready, if any.
    pub(super) fn sleep_duration(&self) -> Option<Duration> {
        let last_event = self.last_event?;
        Some(
            Duration::from_millis(DEBOUNCE_MS)
                .saturating_sub(last_event.elapsed())
                .max(Duration::from_millis(1)),
        )
    }
}

/// Editor swap and backup files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, EventKind, MetadataKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    fn modify(path: &str) -> notify::Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path)
    }

    #[test]
    fn test_burst_collapses_to_one_change() {
        let mut debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        debouncer.add_event(&modify("/icons/logo.svg"));
        debouncer.add_event(&event(EventKind::Create(CreateKind::File), "/icons/logo.svg"));
        debouncer.add_event(&modify("/icons/logo.svg"));
        assert_eq!(debouncer.changes.len(), 1);
    }

    #[test]
    fn test_other_files_ignored() {
        let mut debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        debouncer.add_event(&modify("/icons/other.svg"));
        debouncer.add_event(&modify("/icons/logo.svg.swp"));
        debouncer.add_event(&modify("/icons/logo.svg~"));
        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_metadata_ignored() {
        let mut debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        debouncer.add_event(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            "/icons/logo.svg",
        ));
        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_not_ready_within_window() {
        let mut debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        debouncer.add_event(&modify("/icons/logo.svg"));
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
        assert!(debouncer.sleep_duration().unwrap() <= Duration::from_millis(DEBOUNCE_MS));
    }

    #[test]
    fn test_ready_after_window() {
        let mut debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        debouncer.add_event(&modify("/icons/logo.svg"));
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));

        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes, [PathBuf::from("/icons/logo.svg")]);
        assert!(debouncer.take_if_ready().is_none());
        assert!(debouncer.sleep_duration().is_none());
    }

    #[test]
    fn test_idle_has_no_deadline() {
        let debouncer = Debouncer::new(Path::new("/icons/logo.svg"));
        assert!(!debouncer.is_ready());
        assert!(debouncer.sleep_duration().is_none());
    }
}
