// src/check/batch.rs

//! Aggregation of per-path outcomes into the two result sequences.

use std::path::PathBuf;

use crate::check::cycle::Outcome;
use crate::dispatch::ChangeEvent;
use crate::types::ModDate;

/// Changed and deleted files found by one poll cycle, in encounter order.
///
/// Created fresh per cycle and consumed by [`ResultBatch::into_events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBatch {
    changed: Vec<(PathBuf, ModDate)>,
    deleted: Vec<PathBuf>,
}

impl ResultBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Changed { path, date } => self.changed.push((path, date)),
            Outcome::Deleted { path } => self.deleted.push(path),
            Outcome::Unchanged => {}
        }
    }

    pub fn changed(&self) -> &[(PathBuf, ModDate)] {
        &self.changed
    }

    pub fn deleted(&self) -> &[PathBuf] {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }

    /// Notifications for this batch: changed first, then deleted. Empty
    /// sequences produce no event.
    pub fn into_events(self) -> Vec<ChangeEvent> {
        let mut events = Vec::with_capacity(2);

        if !self.changed.is_empty() {
            let (paths, dates): (Vec<_>, Vec<_>) = self.changed.into_iter().unzip();
            events.push(ChangeEvent::FilesChanged { paths, dates });
        }
        if !self.deleted.is_empty() {
            events.push(ChangeEvent::FilesDeleted {
                paths: self.deleted,
            });
        }

        events
    }
}
