//! # Directory Watcher
//!
//! Wraps a recursive `notify` watcher rooted at the working directory.
//!
//! Every event (create, modify, remove, rename, anything) fires the callback
//! exactly once. There is no debouncing: a burst of N events produces N
//! refreshes, which is fine because a rebuild is idempotent.
//!
//! Events whose paths are all in the ignore list never reach the callback.
//! The app ignores its own log file: otherwise every log line written while
//! handling a refresh would be a new modify event, and the refresh would
//! feed itself. Ignored events are not logged either, for the same reason.
//!
//! The callback runs on the watcher's own thread. It must not touch UI
//! state; [`send_on_change`] builds the only callback the app uses, which
//! just posts `Action::FsChanged` to the event loop's channel.
//!
//! ```text
//! notify thread                        UI thread
//! ─────────────                        ─────────
//! event → on_change() ── mpsc ──→ rx.try_recv() → update(FsChanged) → tree.rebuild()
//! ```

use log::{debug, info, warn};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::core::action::Action;

/// A live subscription. Dropping it stops the watcher thread.
pub struct DirWatcher {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

/// Paths whose own events are dropped (the log file).
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    paths: Vec<PathBuf>,
}

impl IgnoreList {
    /// Paths are canonicalized when they exist so they compare equal to the
    /// absolute paths notify reports.
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let paths = paths
            .into_iter()
            .map(|path| path.canonicalize().unwrap_or(path))
            .collect();
        Self { paths }
    }

    /// True when the event names at least one path and every one is ignored.
    pub fn covers(&self, event: &Event) -> bool {
        !event.paths.is_empty() && event.paths.iter().all(|path| self.paths.contains(path))
    }
}

impl DirWatcher {
    pub fn watch<F>(root: &Path, ignored: IgnoreList, on_change: F) -> Result<Self, notify::Error>
    where
        F: Fn() + Send + 'static,
    {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            forward(res, &ignored, &on_change);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        info!("Watching {}", root.display());
        Ok(Self {
            watcher,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for DirWatcher {
    fn drop(&mut self) {
        // The root may already be gone; the watcher shuts down either way.
        if let Err(e) = self.watcher.unwatch(&self.root) {
            debug!("Unwatch {} failed: {}", self.root.display(), e);
        }
        info!("Stopped watching {}", self.root.display());
    }
}

fn forward<F: Fn()>(res: notify::Result<Event>, ignored: &IgnoreList, on_change: &F) {
    match res {
        Ok(event) if ignored.covers(&event) => {}
        Ok(event) => {
            debug!("Filesystem event {:?} on {:?}", event.kind, event.paths);
            on_change();
        }
        Err(e) => warn!("Watcher error: {}", e),
    }
}

/// Callback that hands a refresh over to the UI thread.
pub fn send_on_change(tx: Sender<Action>) -> impl Fn() + Send + 'static {
    move || {
        if tx.send(Action::FsChanged).is_err() {
            debug!("Dropping filesystem event: event loop is gone");
        }
    }
}
