// src/engine/watchlist.rs

use std::sync::Arc;

use tracing::debug;

use crate::dispatch::ChangeEvent;
use crate::fs::{FileStat, FileSystem};
use crate::types::{CheckMode, RemoteProfile, SkipDisposition, SkipState, TrackedPath};

/// The owner's tracked paths plus the remote profiles they point at.
///
/// Cycles receive a cheap [`snapshot`](Self::snapshot). Acknowledging a
/// result while a cycle still holds the snapshot copies the list first, so a
/// running cycle never sees the update.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    paths: Arc<Vec<TrackedPath>>,
    // Keeps the `Weak` references in `paths` alive.
    profiles: Vec<Arc<RemoteProfile>>,
}

impl Watchlist {
    pub fn new(paths: Vec<TrackedPath>, profiles: Vec<Arc<RemoteProfile>>) -> Self {
        Self {
            paths: Arc::new(paths),
            profiles,
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<TrackedPath>> {
        Arc::clone(&self.paths)
    }

    pub fn paths(&self) -> &[TrackedPath] {
        &self.paths
    }

    pub fn profiles(&self) -> &[Arc<RemoteProfile>] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Record that the owner has seen `event`, so it is not reported again.
    ///
    /// - changed with a valid date: that date becomes the expected one
    /// - changed with an invalid date, or deleted: the path is marked
    ///   unavailable
    /// - a reported pre-verified path goes back to normal checking
    pub fn acknowledge(&mut self, event: &ChangeEvent) {
        let paths = Arc::make_mut(&mut self.paths);

        match event {
            ChangeEvent::FilesChanged {
                paths: changed,
                dates,
            } => {
                for (path, date) in changed.iter().zip(dates) {
                    let Some(tracked) = paths.iter_mut().find(|t| &t.path == path) else {
                        continue;
                    };
                    tracked.pre_verified = false;
                    if date.is_valid() {
                        tracked.expected = *date;
                        tracked.skip = SkipState::default();
                    } else {
                        tracked.skip = SkipState::new(SkipDisposition::Unavailable, *date);
                    }
                    debug!(?path, %date, "acknowledged change");
                }
            }
            ChangeEvent::FilesDeleted { paths: deleted } => {
                for path in deleted {
                    if let Some(tracked) = paths.iter_mut().find(|t| &t.path == path) {
                        tracked.skip.disposition = SkipDisposition::Unavailable;
                        debug!(?path, "acknowledged deletion");
                    }
                }
            }
        }
    }

    /// Return unavailable local paths to normal checking once a stat finds
    /// them readable again. Returns how many paths were recovered.
    ///
    /// The expected date is left alone, so a re-created or modified file is
    /// reported by the next cycle.
    pub fn recover(&mut self, fs: &dyn FileSystem) -> usize {
        let readable: Vec<usize> = self
            .paths
            .iter()
            .enumerate()
            .filter(|(_, t)| t.skip.is_unavailable() && t.mode() == CheckMode::Local)
            .filter(|(_, t)| matches!(fs.stat(&t.path), FileStat::Present(d) if d.is_valid()))
            .map(|(i, _)| i)
            .collect();

        if readable.is_empty() {
            return 0;
        }

        let paths = Arc::make_mut(&mut self.paths);
        for &i in &readable {
            paths[i].skip = SkipState::default();
            debug!(path = ?paths[i].path, "path observable again");
        }
        readable.len()
    }
}
