// src/engine/checker.rs

use std::sync::Arc;

use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::engine::task::{CycleReport, InFlight, PollTask};
use crate::errors::{ChangecheckError, Result};
use crate::fs::FileSystem;
use crate::types::TrackedPath;

/// Owner-side handle for poll tasks.
///
/// Allows at most one [`PollTask`] in flight. The owner can query
/// [`is_checking`](Self::is_checking) at any time or await the current task.
#[derive(Debug)]
pub struct ChangeChecker {
    fs: Arc<dyn FileSystem>,
    dispatcher: Dispatcher,
    in_flight: InFlight,
    current: Option<PollTask>,
}

impl ChangeChecker {
    pub fn new(fs: Arc<dyn FileSystem>, dispatcher: Dispatcher) -> Self {
        Self {
            fs,
            dispatcher,
            in_flight: InFlight::new(),
            current: None,
        }
    }

    pub fn is_checking(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Start a cycle over a snapshot of `paths`.
    ///
    /// Fails with [`ChangecheckError::AlreadyRunning`] while the previous
    /// task is still in flight.
    pub fn start(&mut self, paths: Arc<Vec<TrackedPath>>) -> Result<()> {
        if self.is_checking() {
            return Err(ChangecheckError::AlreadyRunning);
        }

        debug!(tracked = paths.len(), "starting change check");
        self.current = Some(PollTask::spawn(
            paths,
            Arc::clone(&self.fs),
            self.dispatcher.clone(),
            &self.in_flight,
        ));
        Ok(())
    }

    /// Request cancellation of the current task, if any.
    pub fn cancel(&self) {
        if let Some(task) = &self.current {
            task.cancel();
        }
    }

    /// Await the current task. `None` if nothing was started since the last
    /// wait.
    pub async fn wait(&mut self) -> Result<Option<CycleReport>> {
        match self.current.take() {
            Some(task) => Ok(Some(task.wait().await?)),
            None => Ok(None),
        }
    }

    /// Collect the current task if it has already finished.
    pub async fn reap(&mut self) -> Result<Option<CycleReport>> {
        let finished = self.current.as_ref().is_some_and(PollTask::is_finished);
        if finished {
            self.wait().await
        } else {
            Ok(None)
        }
    }
}
