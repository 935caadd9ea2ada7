// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::ModDate;

pub mod mock;

/// What a single stat call reports about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStat {
    /// No regular file at this path.
    Missing,
    /// A file exists; its date is invalid when the metadata was unreadable.
    Present(ModDate),
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Existence and modification date of `path`. Never fails: unreadable
    /// metadata is reported as `Present(ModDate::invalid())`.
    fn stat(&self, path: &Path) -> FileStat;

    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn stat(&self, path: &Path) -> FileStat {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => FileStat::Missing,
            Ok(meta) => match meta.modified() {
                Ok(t) => FileStat::Present(ModDate::from(t)),
                Err(_) => FileStat::Present(ModDate::invalid()),
            },
            // A parent replaced by a regular file means the file is gone too.
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                FileStat::Missing
            }
            Err(err) => {
                tracing::debug!(?path, %err, "metadata unreadable; reporting invalid date");
                FileStat::Present(ModDate::invalid())
            }
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }
}
