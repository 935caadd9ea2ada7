#![allow(dead_code)]

pub use changecheck_test_utils::{at, builders, init_tracing, recording, with_timeout};

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::mpsc as std_mpsc;

use changecheck::fs::{FileStat, FileSystem};
use changecheck::fs::mock::MockFileSystem;

/// Filesystem whose `stat` blocks until the test releases it, so a poll
/// task can be held in flight.
#[derive(Debug)]
pub struct GatedFileSystem {
    inner: MockFileSystem,
    gate: Mutex<std_mpsc::Receiver<()>>,
}

impl GatedFileSystem {
    pub fn new(inner: MockFileSystem) -> (Arc<Self>, std_mpsc::Sender<()>) {
        let (tx, rx) = std_mpsc::channel();
        let fs = Arc::new(Self {
            inner,
            gate: Mutex::new(rx),
        });
        (fs, tx)
    }
}

impl FileSystem for GatedFileSystem {
    fn stat(&self, path: &Path) -> FileStat {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.stat(path)
    }

    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        self.inner.read_to_string(path)
    }
}
