// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::dispatch::{ChangeEvent, ChangeHandler, Dispatcher};
use crate::engine::checker::ChangeChecker;
use crate::engine::watchlist::Watchlist;
use crate::errors::Result;
use crate::fs::FileSystem;

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Delay between the starts of two cycles.
    pub interval: Duration,
    /// Run exactly one cycle, deliver its results and return.
    pub once: bool,
}

enum Step {
    Shutdown,
    Tick,
    Event(ChangeEvent),
}

/// Polling loop: the owner of a [`Watchlist`] and a [`ChangeChecker`].
///
/// Events are consumed on the loop's own task. Each one is acknowledged in
/// the watch list and then passed to the handler. Before each cycle, paths
/// marked unavailable are probed and put back into normal checking once
/// they are readable.
pub struct PollRuntime<H: ChangeHandler> {
    fs: Arc<dyn FileSystem>,
    checker: ChangeChecker,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    watchlist: Watchlist,
    handler: H,
    options: PollOptions,
}

impl<H: ChangeHandler> fmt::Debug for PollRuntime<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollRuntime")
            .field("checker", &self.checker)
            .field("watchlist", &self.watchlist)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<H: ChangeHandler> PollRuntime<H> {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        watchlist: Watchlist,
        handler: H,
        options: PollOptions,
    ) -> Self {
        let (dispatcher, events) = Dispatcher::channel();
        Self {
            checker: ChangeChecker::new(Arc::clone(&fs), dispatcher),
            fs,
            events,
            watchlist,
            handler,
            options,
        }
    }

    /// Run until `shutdown` resolves (or after one cycle with `once`).
    ///
    /// An in-flight cycle is always allowed to finish and its results are
    /// handled before returning. Returns the updated watch list and the
    /// handler.
    pub async fn run<S>(mut self, shutdown: S) -> Result<(Watchlist, H)>
    where
        S: Future<Output = ()>,
    {
        info!(
            tracked = self.watchlist.len(),
            interval_ms = self.options.interval.as_millis() as u64,
            once = self.options.once,
            "change checker started"
        );

        if self.options.once {
            self.checker.start(self.watchlist.snapshot())?;
            return self.finish().await;
        }

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let step = tokio::select! {
                _ = &mut shutdown => Step::Shutdown,
                _ = ticker.tick() => Step::Tick,
                Some(event) = self.events.recv() => Step::Event(event),
            };

            match step {
                Step::Shutdown => {
                    info!("shutdown requested; letting in-flight check finish");
                    break;
                }
                Step::Tick => self.on_tick().await?,
                Step::Event(event) => self.on_event(event),
            }
        }

        self.finish().await
    }

    async fn on_tick(&mut self) -> Result<()> {
        self.checker.reap().await?;
        if self.checker.is_checking() {
            debug!("previous check still in flight; skipping tick");
            return Ok(());
        }

        // Results of the finished cycle must be acknowledged before the next
        // snapshot is taken.
        self.drain();
        let recovered = self.watchlist.recover(self.fs.as_ref());
        if recovered > 0 {
            debug!(recovered, "unavailable paths are readable again");
        }
        self.checker.start(self.watchlist.snapshot())
    }

    fn on_event(&mut self, event: ChangeEvent) {
        self.watchlist.acknowledge(&event);
        self.handler.handle(event);
    }

    fn drain(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.on_event(event);
        }
    }

    async fn finish(mut self) -> Result<(Watchlist, H)> {
        if let Some(report) = self.checker.wait().await? {
            debug!(?report, "final check collected");
        }
        self.drain();
        info!("change checker stopped");
        Ok((self.watchlist, self.handler))
    }
}

/// Render an event as one line per file.
pub fn format_event(event: &ChangeEvent) -> Vec<String> {
    match event {
        ChangeEvent::FilesChanged { paths, dates } => paths
            .iter()
            .zip(dates)
            .map(|(path, date)| format!("changed {} {}", path.display(), date))
            .collect(),
        ChangeEvent::FilesDeleted { paths } => paths
            .iter()
            .map(|path| format!("deleted {}", path.display()))
            .collect(),
    }
}

/// Handler used by the binary: prints every result to stdout.
#[derive(Debug, Default)]
pub struct StdoutReporter;

impl ChangeHandler for StdoutReporter {
    fn handle(&mut self, event: ChangeEvent) {
        for line in format_event(&event) {
            println!("{line}");
        }
    }
}
