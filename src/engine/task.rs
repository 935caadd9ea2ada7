// src/engine/task.rs

//! One-shot poll task.
//!
//! A [`PollTask`] is created in `Running` state: spawning it registers it as
//! in flight with its owner and submits the cycle to Tokio's blocking pool.
//! When classification and delivery are done the registration is cleared
//! and the task is `Completed`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::check::run_cycle_until;
use crate::dispatch::Dispatcher;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::TrackedPath;

/// Shared "a poll task is running" flag between an owner and its task.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn register(&self) -> InFlightGuard {
        self.0.store(true, Ordering::Release);
        InFlightGuard(Arc::clone(&self.0))
    }
}

/// Clears the in-flight flag when the job ends, even by panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Completed,
}

/// Summary of a finished cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub tracked: usize,
    pub changed: usize,
    pub deleted: usize,
    /// Number of notifications handed to the dispatcher (0, 1 or 2).
    pub events: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct PollTask {
    handle: JoinHandle<CycleReport>,
    cancel: Arc<AtomicBool>,
}

impl PollTask {
    /// Register with `in_flight` and start classifying `paths`.
    ///
    /// Must be called from within a Tokio runtime. The caller is responsible
    /// for not starting a second task while `in_flight` is set.
    pub fn spawn(
        paths: Arc<Vec<TrackedPath>>,
        fs: Arc<dyn FileSystem>,
        dispatcher: Dispatcher,
        in_flight: &InFlight,
    ) -> Self {
        let guard = in_flight.register();
        let cancel = Arc::new(AtomicBool::new(false));
        let job_cancel = Arc::clone(&cancel);

        let handle = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let report = run_job(&paths, fs.as_ref(), &dispatcher, &job_cancel);
            debug!(
                tracked = report.tracked,
                changed = report.changed,
                deleted = report.deleted,
                cancelled = report.cancelled,
                "change check completed"
            );
            report
        });

        Self { handle, cancel }
    }

    pub fn state(&self) -> TaskState {
        if self.handle.is_finished() {
            TaskState::Completed
        } else {
            TaskState::Running
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the task to stop before the next tracked path. A cancelled cycle
    /// delivers nothing. Has no effect once delivery has started.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub async fn wait(self) -> Result<CycleReport> {
        Ok(self.handle.await?)
    }
}

fn run_job(
    paths: &[TrackedPath],
    fs: &dyn FileSystem,
    dispatcher: &Dispatcher,
    cancel: &AtomicBool,
) -> CycleReport {
    let mut report = CycleReport {
        tracked: paths.len(),
        ..CycleReport::default()
    };

    let Some(batch) = run_cycle_until(fs, paths, || cancel.load(Ordering::Acquire)) else {
        report.cancelled = true;
        return report;
    };

    report.changed = batch.changed().len();
    report.deleted = batch.deleted().len();
    report.events = dispatcher.deliver(batch);
    report
}
