// src/check/cycle.rs

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::check::batch::ResultBatch;
use crate::fs::{FileStat, FileSystem};
use crate::types::{CheckMode, ModDate, SkipDisposition, TrackedPath};

/// Result of classifying one tracked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file differs from what the owner expects. `date` is invalid when
    /// the file exists but its date could not be read.
    Changed { path: PathBuf, date: ModDate },
    Deleted { path: PathBuf },
    /// Nothing to report (also used for skipped remote paths).
    Unchanged,
}

/// Classify a single tracked path. First matching rule wins.
pub fn classify(fs: &dyn FileSystem, tracked: &TrackedPath) -> Outcome {
    let observed = match tracked.mode() {
        // Remote dates proved unreliable; such paths are never reported.
        CheckMode::Remote => {
            trace!(path = ?tracked.path, "remote path; skipping");
            return Outcome::Unchanged;
        }
        CheckMode::PreVerified(date) => {
            return Outcome::Changed {
                path: tracked.path.clone(),
                date,
            };
        }
        CheckMode::Local => fs.stat(&tracked.path),
    };

    // Unobservable paths are never reported, whatever the stat says.
    if tracked.skip.is_unavailable() {
        trace!(path = ?tracked.path, "path marked unavailable; skipping");
        return Outcome::Unchanged;
    }

    let date = match observed {
        FileStat::Missing => {
            return Outcome::Deleted {
                path: tracked.path.clone(),
            };
        }
        FileStat::Present(date) => date,
    };

    // Locked or unreadable: let the owner decide what that means.
    if !date.is_valid() {
        return Outcome::Changed {
            path: tracked.path.clone(),
            date,
        };
    }

    if tracked.skip.disposition == SkipDisposition::SkipOnce && date == tracked.skip.date {
        trace!(path = ?tracked.path, "change already acknowledged");
        return Outcome::Unchanged;
    }

    // Some platforms only keep whole seconds.
    let changed = !tracked.expected.is_valid() || !tracked.expected.same_second(&date);
    if !changed {
        return Outcome::Unchanged;
    }

    Outcome::Changed {
        path: tracked.path.clone(),
        date,
    }
}

/// Run a complete cycle over `paths` in order.
pub fn run_cycle(fs: &dyn FileSystem, paths: &[TrackedPath]) -> ResultBatch {
    run_cycle_until(fs, paths, || false).unwrap_or_default()
}

/// Like [`run_cycle`], but checks `cancelled` before each tracked path.
///
/// Returns `None` if the cycle was cancelled; partial results are dropped.
pub fn run_cycle_until(
    fs: &dyn FileSystem,
    paths: &[TrackedPath],
    cancelled: impl Fn() -> bool,
) -> Option<ResultBatch> {
    let mut batch = ResultBatch::new();
    for tracked in paths {
        if cancelled() {
            debug!("poll cycle cancelled; discarding partial results");
            return None;
        }
        batch.record(classify(fs, tracked));
    }
    debug!(
        tracked = paths.len(),
        changed = batch.changed().len(),
        deleted = batch.deleted().len(),
        "poll cycle finished"
    );
    Some(batch)
}
