// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::engine::Watchlist;
use crate::types::{ModDate, RemoteProfile, SkipDisposition, SkipState, TrackedPath};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// interval_ms = 2000
///
/// [remote.work]
/// url = "sftp://example.org/home"
///
/// [[path]]
/// path = "notes.txt"
/// expected = "2024-01-01T10:00:00Z"
/// skip = "skip_once"
/// skip_date = "2024-01-01T10:05:00Z"
///
/// [[path]]
/// path = "/srv/site/index.html"
/// remote = "work"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Remote profiles from `[remote.<name>]`.
    #[serde(default)]
    pub remote: BTreeMap<String, RemoteConfig>,

    /// Tracked files from `[[path]]`, in check order.
    #[serde(default)]
    pub path: Vec<PathConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Delay between the starts of two poll cycles.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    2000
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// `[remote.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
}

/// One `[[path]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    /// Relative paths are resolved against the config file's directory.
    pub path: PathBuf,

    /// RFC 3339 date the file is expected to have. Absent means unknown,
    /// which reports the file as changed on the first cycle.
    #[serde(default)]
    pub expected: Option<String>,

    #[serde(default)]
    pub skip: SkipDisposition,

    #[serde(default)]
    pub skip_date: Option<String>,

    #[serde(default)]
    pub pre_verified: bool,

    /// Name of a `[remote.<name>]` profile.
    #[serde(default)]
    pub remote: Option<String>,
}

/// A tracked path after validation.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub path: PathBuf,
    pub expected: ModDate,
    pub skip: SkipState,
    pub pre_verified: bool,
    pub remote: Option<String>,
}

/// Validated configuration. Built through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    remote: BTreeMap<String, RemoteConfig>,
    entries: Vec<PathEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        remote: BTreeMap<String, RemoteConfig>,
        entries: Vec<PathEntry>,
    ) -> Self {
        Self {
            config,
            remote,
            entries,
        }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn remotes(&self) -> &BTreeMap<String, RemoteConfig> {
        &self.remote
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// Build the owner's watch list, resolving relative paths against
    /// `base_dir`.
    pub fn to_watchlist(&self, base_dir: &Path) -> Watchlist {
        let profiles: BTreeMap<&str, Arc<RemoteProfile>> = self
            .remote
            .iter()
            .map(|(name, remote)| {
                let profile = RemoteProfile {
                    name: name.clone(),
                    url: remote.url.clone(),
                };
                (name.as_str(), Arc::new(profile))
            })
            .collect();

        let paths = self
            .entries
            .iter()
            .map(|entry| TrackedPath {
                path: if entry.path.is_absolute() {
                    entry.path.clone()
                } else {
                    base_dir.join(&entry.path)
                },
                expected: entry.expected,
                remote: entry
                    .remote
                    .as_deref()
                    .and_then(|name| profiles.get(name))
                    .map(Arc::downgrade),
                skip: entry.skip,
                pre_verified: entry.pre_verified,
            })
            .collect();

        Watchlist::new(paths, profiles.into_values().collect())
    }
}
