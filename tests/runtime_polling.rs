mod common;
use crate::common::builders::TrackedPathBuilder;
use crate::common::recording::RecordingHandler;
use crate::common::{at, init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use changecheck::config::load_and_validate;
use changecheck::dispatch::ChangeEvent;
use changecheck::engine::{PollOptions, PollRuntime, Watchlist};
use changecheck::fs::mock::MockFileSystem;
use changecheck::fs::RealFileSystem;
use changecheck::types::{ModDate, SkipDisposition};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn once_mode_reports_real_files_and_acknowledges() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("edited.txt"), "new")?;
        std::fs::write(dir.path().join("same.txt"), "same")?;
        let same_date = ModDate::from(std::fs::metadata(dir.path().join("same.txt"))?.modified()?);

        let config_path = dir.path().join("Changecheck.toml");
        std::fs::write(
            &config_path,
            format!(
                r#"
[remote.work]
url = "sftp://example.org"

[[path]]
path = "edited.txt"
expected = "2001-01-01T00:00:00Z"

[[path]]
path = "same.txt"
expected = "{same_date}"

[[path]]
path = "removed.txt"
expected = "2001-01-01T00:00:00Z"

[[path]]
path = "remote.txt"
remote = "work"
"#
            ),
        )?;

        let cfg = load_and_validate(&RealFileSystem, &config_path)?;
        let watchlist = cfg.to_watchlist(dir.path());

        let recorder = RecordingHandler::new();
        let runtime = PollRuntime::new(
            Arc::new(RealFileSystem),
            watchlist,
            recorder.clone(),
            PollOptions {
                interval: Duration::from_millis(10),
                once: true,
            },
        );
        let (watchlist, _) = runtime.run(std::future::pending()).await?;

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            ChangeEvent::FilesChanged { paths, dates } => {
                assert_eq!(paths, &vec![dir.path().join("edited.txt")]);
                assert!(dates[0].is_valid());
            }
            other => panic!("expected FilesChanged first, got {other:?}"),
        }
        assert_eq!(
            events[1],
            ChangeEvent::FilesDeleted {
                paths: vec![dir.path().join("removed.txt")],
            }
        );

        let edited = &watchlist.paths()[0];
        assert_ne!(edited.expected, ModDate::parse_rfc3339("2001-01-01T00:00:00Z")?);
        let removed = &watchlist.paths()[2];
        assert_eq!(removed.skip.disposition, SkipDisposition::Unavailable);

        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn repeated_cycles_report_each_change_once() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("a.txt", at(100, 0));

        let watchlist = Watchlist::new(
            vec![
                TrackedPathBuilder::new("a.txt").build(),
                TrackedPathBuilder::new("b.txt").expected(at(1, 0)).build(),
            ],
            Vec::new(),
        );

        let recorder = RecordingHandler::new();
        let runtime = PollRuntime::new(
            Arc::new(fs.clone()),
            watchlist,
            recorder.clone(),
            PollOptions {
                interval: Duration::from_millis(5),
                once: false,
            },
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(runtime.run(async {
            let _ = stop_rx.await;
        }));

        // First cycle: a.txt has no known date, b.txt is missing.
        while recorder.events().len() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(recorder.events().len(), 2);

        fs.touch("a.txt", at(200, 0));
        while recorder.events().len() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let _ = stop_tx.send(());
        let (watchlist, _) = handle.await??;

        let events = recorder.events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[2],
            ChangeEvent::FilesChanged {
                paths: vec!["a.txt".into()],
                dates: vec![at(200, 0)],
            }
        );
        assert_eq!(watchlist.paths()[0].expected, at(200, 0));
        assert!(watchlist.paths()[1].skip.is_unavailable());

        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn recreated_file_is_reported_again() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("a.txt", at(100, 0));

        let watchlist = Watchlist::new(
            vec![TrackedPathBuilder::new("a.txt").expected(at(100, 0)).build()],
            Vec::new(),
        );

        let recorder = RecordingHandler::new();
        let runtime = PollRuntime::new(
            Arc::new(fs.clone()),
            watchlist,
            recorder.clone(),
            PollOptions {
                interval: Duration::from_millis(5),
                once: false,
            },
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(runtime.run(async {
            let _ = stop_rx.await;
        }));

        fs.remove("a.txt");
        while recorder.events().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        // Still gone: reported once only.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(recorder.events().len(), 1);

        fs.add_file("a.txt", at(300, 0));
        while recorder.events().len() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let _ = stop_tx.send(());
        let (watchlist, _) = handle.await??;

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            ChangeEvent::FilesDeleted {
                paths: vec!["a.txt".into()],
            }
        );
        assert_eq!(
            events[1],
            ChangeEvent::FilesChanged {
                paths: vec!["a.txt".into()],
                dates: vec![at(300, 0)],
            }
        );
        assert_eq!(watchlist.paths()[0].expected, at(300, 0));
        assert!(!watchlist.paths()[0].skip.is_unavailable());

        Ok::<(), Box<dyn Error>>(())
    })
    .await
}
