//! Watching a single file for edits.
//!
//! ```text
//! notify (parent dir) → Debouncer (200 ms) → FileWatcher::wait
//! ```

mod debouncer;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::core::is_shutdown;
use debouncer::Debouncer;

/// Longest wait between shutdown checks while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct FileWatcher {
    notify_rx: Receiver<notify::Result<notify::Event>>,
    /// Kept alive for the lifetime of the watch.
    _watcher: RecommendedWatcher,
    debouncer: Debouncer,
}

impl FileWatcher {
    /// Start watching `target`. Events are buffered from this point on.
    pub fn new(target: &Path) -> Result<Self> {
        let (notify_tx, notify_rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })
        .context("Failed to create file watcher")?;

        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch `{}`", dir.display()))?;

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            debouncer: Debouncer::new(target),
        })
    }

    /// Block until the file changed, or return `None` on shutdown.
    pub fn wait(&mut self) -> Option<Vec<PathBuf>> {
        loop {
            if is_shutdown() {
                return None;
            }
            if let Some(changes) = self.debouncer.take_if_ready() {
                return Some(changes);
            }

            let timeout = self
                .debouncer
                .sleep_duration()
                .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));

            match self.notify_rx.recv_timeout(timeout) {
                Ok(Ok(event)) => self.debouncer.add_event(&event),
                Ok(Err(e)) => crate::log!("watch"; "error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
