mod common;
use crate::common::builders::TrackedPathBuilder;
use crate::common::recording::RecordingHandler;
use crate::common::{at, init_tracing, with_timeout, GatedFileSystem};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use changecheck::dispatch::{spawn_consumer, ChangeEvent, Dispatcher};
use changecheck::engine::{ChangeChecker, InFlight, PollTask, TaskState};
use changecheck::errors::ChangecheckError;
use changecheck::fs::mock::MockFileSystem;
use changecheck::types::ModDate;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn consumer_sees_changed_before_deleted() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("a.txt", at(20, 0));
        fs.add_unreadable("b.txt");

        let paths = Arc::new(vec![
            TrackedPathBuilder::new("gone.txt").expected(at(1, 0)).build(),
            TrackedPathBuilder::new("a.txt").expected(at(10, 0)).build(),
            TrackedPathBuilder::new("b.txt").expected(at(10, 0)).build(),
        ]);

        let (dispatcher, rx) = Dispatcher::channel();
        let recorder = RecordingHandler::new();
        let consumer = spawn_consumer(rx, recorder.clone());

        let in_flight = InFlight::new();
        let report = PollTask::spawn(paths, Arc::new(fs), dispatcher, &in_flight)
            .wait()
            .await?;
        assert_eq!(report.events, 2);
        assert!(!in_flight.is_set());

        // All dispatchers are gone, so the consumer drains and stops.
        consumer.await?;

        assert_eq!(
            recorder.events(),
            vec![
                ChangeEvent::FilesChanged {
                    paths: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
                    dates: vec![at(20, 0), ModDate::invalid()],
                },
                ChangeEvent::FilesDeleted {
                    paths: vec![PathBuf::from("gone.txt")],
                },
            ]
        );
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn nothing_to_report_sends_nothing() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("a.txt", at(10, 0));
        let paths = Arc::new(vec![
            TrackedPathBuilder::new("a.txt").expected(at(10, 500)).build(),
        ]);

        let (dispatcher, rx) = Dispatcher::channel();
        let recorder = RecordingHandler::new();
        let consumer = spawn_consumer(rx, recorder.clone());

        let report = PollTask::spawn(paths, Arc::new(fs), dispatcher, &InFlight::new())
            .wait()
            .await?;
        consumer.await?;

        assert_eq!(report.events, 0);
        assert!(recorder.events().is_empty());
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn checker_rejects_second_start_while_in_flight() -> TestResult {
    with_timeout(async {
        init_tracing();

        let inner = MockFileSystem::new();
        let (fs, release) = GatedFileSystem::new(inner);
        let (dispatcher, mut rx) = Dispatcher::channel();
        let mut checker = ChangeChecker::new(fs, dispatcher);

        let paths = Arc::new(vec![TrackedPathBuilder::new("gone.txt").build()]);
        checker.start(Arc::clone(&paths))?;
        assert!(checker.is_checking());

        let err = checker.start(Arc::clone(&paths)).unwrap_err();
        assert!(matches!(err, ChangecheckError::AlreadyRunning));

        release.send(())?;
        let report = checker.wait().await?.expect("a task was started");
        assert_eq!(report.deleted, 1);
        assert!(!checker.is_checking());

        assert!(matches!(
            rx.recv().await,
            Some(ChangeEvent::FilesDeleted { .. })
        ));

        checker.start(paths)?;
        release.send(())?;
        checker.wait().await?;
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn cancelled_task_delivers_nothing() -> TestResult {
    with_timeout(async {
        init_tracing();

        let (fs, release) = GatedFileSystem::new(MockFileSystem::new());
        let (dispatcher, mut rx) = Dispatcher::channel();
        let in_flight = InFlight::new();

        let paths = Arc::new(vec![
            TrackedPathBuilder::new("first.txt").build(),
            TrackedPathBuilder::new("second.txt").build(),
        ]);
        let task = PollTask::spawn(paths, fs, dispatcher, &in_flight);
        assert_eq!(task.state(), TaskState::Running);

        // Let the first stat through only after asking for cancellation.
        task.cancel();
        let _ = release.send(());

        let report = task.wait().await?;
        assert!(report.cancelled);
        assert_eq!(report.events, 0);
        assert!(!in_flight.is_set());
        assert!(rx.recv().await.is_none());
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}
