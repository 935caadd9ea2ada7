// src/dispatch/mod.rs

//! Asynchronous delivery of poll results to the owning consumer.
//!
//! The poll task runs on a blocking worker thread and must never execute
//! consumer code on its own stack. It only pushes [`ChangeEvent`]s into an
//! unbounded Tokio channel; the consumer drains that channel on its own
//! execution context, either by hand or through [`spawn_consumer`] with a
//! [`ChangeHandler`].
//!
//! Both notifications of one cycle go through the same channel, so a
//! `FilesChanged` is always observed before the `FilesDeleted` of the same
//! cycle.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::check::ResultBatch;
use crate::types::ModDate;

/// Notification delivered to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// `paths[i]` was observed with modification date `dates[i]`.
    FilesChanged {
        paths: Vec<PathBuf>,
        dates: Vec<ModDate>,
    },
    FilesDeleted { paths: Vec<PathBuf> },
}

impl ChangeEvent {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            ChangeEvent::FilesChanged { paths, .. } => paths,
            ChangeEvent::FilesDeleted { paths } => paths,
        }
    }
}

/// Consumer-defined reaction to poll results.
pub trait ChangeHandler: Send + 'static {
    fn handle(&mut self, event: ChangeEvent);
}

/// Sending side used by poll tasks. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl Dispatcher {
    pub fn new(tx: mpsc::UnboundedSender<ChangeEvent>) -> Self {
        Self { tx }
    }

    /// Create a dispatcher together with the receiver the consumer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue the notifications for `batch`; returns how many were queued.
    ///
    /// Never blocks. If the consumer is gone the events are dropped.
    pub fn deliver(&self, batch: ResultBatch) -> usize {
        let mut sent = 0;
        for event in batch.into_events() {
            debug!(files = event.paths().len(), ?event, "queueing change event");
            if self.tx.send(event).is_err() {
                warn!("change consumer has gone away; dropping poll results");
                break;
            }
            sent += 1;
        }
        sent
    }
}

/// Drain `rx` on a dedicated Tokio task, feeding every event to `handler`.
///
/// The handler is handed back once every [`Dispatcher`] has been dropped.
pub fn spawn_consumer<H: ChangeHandler>(
    mut rx: mpsc::UnboundedReceiver<ChangeEvent>,
    mut handler: H,
) -> JoinHandle<H> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            handler.handle(event);
        }
        debug!("change consumer finished (channel closed)");
        handler
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Outcome;

    #[derive(Default)]
    struct Collect(Vec<ChangeEvent>);

    impl ChangeHandler for Collect {
        fn handle(&mut self, event: ChangeEvent) {
            self.0.push(event);
        }
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let (dispatcher, rx) = Dispatcher::channel();
        assert_eq!(dispatcher.deliver(ResultBatch::new()), 0);
        drop(dispatcher);

        let handler = spawn_consumer(rx, Collect::default()).await.unwrap();
        assert!(handler.0.is_empty());
    }

    #[tokio::test]
    async fn consumer_sees_changed_before_deleted() {
        let (dispatcher, rx) = Dispatcher::channel();

        let mut batch = ResultBatch::new();
        batch.record(Outcome::Deleted {
            path: PathBuf::from("gone.txt"),
        });
        batch.record(Outcome::Changed {
            path: PathBuf::from("a.txt"),
            date: ModDate::invalid(),
        });
        assert_eq!(dispatcher.deliver(batch), 2);
        drop(dispatcher);

        let handler = spawn_consumer(rx, Collect::default()).await.unwrap();
        assert_eq!(handler.0.len(), 2);
        assert!(matches!(handler.0[0], ChangeEvent::FilesChanged { .. }));
        assert!(matches!(handler.0[1], ChangeEvent::FilesDeleted { .. }));
    }

    #[test]
    fn closed_consumer_is_not_an_error() {
        let (dispatcher, rx) = Dispatcher::channel();
        drop(rx);

        let mut batch = ResultBatch::new();
        batch.record(Outcome::Deleted {
            path: PathBuf::from("gone.txt"),
        });
        assert_eq!(dispatcher.deliver(batch), 0);
    }
}
