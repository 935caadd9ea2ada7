// src/fs/mock.rs

use super::{FileStat, FileSystem};
use crate::types::ModDate;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct MockEntry {
    contents: String,
    modified: ModDate,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep a handle while the poll task owns
/// another one.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    stats: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file with the given modification date.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: ModDate) {
        self.add_file_with_contents(path, modified, "");
    }

    pub fn add_file_with_contents(
        &self,
        path: impl AsRef<Path>,
        modified: ModDate,
        contents: impl Into<String>,
    ) {
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.as_ref().to_path_buf(),
            MockEntry {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Add a file that exists but whose metadata can't be read.
    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        self.add_file(path, ModDate::invalid());
    }

    pub fn touch(&self, path: impl AsRef<Path>, modified: ModDate) {
        let mut files = self.files.lock().unwrap();
        if let Some(entry) = files.get_mut(path.as_ref()) {
            entry.modified = modified;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.remove(path.as_ref());
    }

    /// Every path passed to `stat`, in call order.
    pub fn stat_calls(&self) -> Vec<PathBuf> {
        self.stats.lock().unwrap().clone()
    }
}

impl FileSystem for MockFileSystem {
    fn stat(&self, path: &Path) -> FileStat {
        self.stats.lock().unwrap().push(path.to_path_buf());

        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(entry) => FileStat::Present(entry.modified),
            None => FileStat::Missing,
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(entry) => Ok(entry.contents.clone()),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
