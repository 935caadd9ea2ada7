// src/types.rs

//! Data model shared by the classifier, the dispatcher and the owner.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Weak;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A file modification date that may be invalid.
///
/// An invalid date stands for "unknown": the expected date was never
/// recorded, or the file exists but its metadata could not be read (locked,
/// permission denied, ...).
///
/// `PartialEq` compares at full precision. Use [`ModDate::same_second`] for
/// the platform-tolerant comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModDate(Option<DateTime<Utc>>);

impl ModDate {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Seconds since the Unix epoch with the sub-second part dropped.
    ///
    /// Rounds towards negative infinity, so dates before 1970 truncate the
    /// same way as later ones.
    pub fn whole_seconds(&self) -> Option<i64> {
        self.0.map(|at| at.timestamp())
    }

    /// True if both dates are valid and fall into the same whole second.
    pub fn same_second(&self, other: &ModDate) -> bool {
        match (self.whole_seconds(), other.whole_seconds()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Parse an RFC 3339 timestamp (e.g. `2024-01-01T10:00:00.250Z`).
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        let at = DateTime::parse_from_rfc3339(s.trim())?;
        Ok(Self::new(at.with_timezone(&Utc)))
    }
}

impl From<SystemTime> for ModDate {
    fn from(t: SystemTime) -> Self {
        Self::new(DateTime::<Utc>::from(t))
    }
}

impl From<DateTime<Utc>> for ModDate {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for ModDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => f.write_str("invalid"),
        }
    }
}

/// What the owner has decided about a path between cycles.
///
/// - `None`: report normally.
/// - `SkipOnce`: the owner already acknowledged the file as it is at
///   [`SkipState::date`]; don't report that exact date again.
/// - `Unavailable`: the path is currently unobservable; never report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipDisposition {
    #[default]
    None,
    SkipOnce,
    Unavailable,
}

impl FromStr for SkipDisposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(SkipDisposition::None),
            "skip_once" | "skip" => Ok(SkipDisposition::SkipOnce),
            "unavailable" | "unavail" => Ok(SkipDisposition::Unavailable),
            other => Err(format!(
                "invalid skip disposition: {other} (expected \"none\", \"skip_once\" or \"unavailable\")"
            )),
        }
    }
}

/// Per-path memo maintained by the owner. Read-only to a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipState {
    pub disposition: SkipDisposition,
    /// The modification date the owner recorded alongside the disposition.
    pub date: ModDate,
}

impl SkipState {
    pub fn new(disposition: SkipDisposition, date: ModDate) -> Self {
        Self { disposition, date }
    }

    pub fn is_unavailable(&self) -> bool {
        self.disposition == SkipDisposition::Unavailable
    }
}

/// Descriptor of a non-local storage location.
///
/// Checking remote dates is disabled, so the classifier only ever looks at
/// whether a tracked path refers to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProfile {
    pub name: String,
    pub url: String,
}

/// How the classifier has to treat one tracked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Hosted on a remote profile; never classified.
    Remote,
    /// The owner already established the change; report it with this date.
    PreVerified(ModDate),
    /// Stat the local file and compare.
    Local,
}

/// One watched file, as handed to a poll cycle.
#[derive(Debug, Clone)]
pub struct TrackedPath {
    pub path: PathBuf,
    /// Modification date the owner last saw; invalid means "unknown".
    pub expected: ModDate,
    pub remote: Option<Weak<RemoteProfile>>,
    pub skip: SkipState,
    pub pre_verified: bool,
}

impl TrackedPath {
    /// A local path with a known expected date and no skip state.
    pub fn new(path: impl Into<PathBuf>, expected: ModDate) -> Self {
        Self {
            path: path.into(),
            expected,
            remote: None,
            skip: SkipState::default(),
            pre_verified: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A set remote reference wins even if the profile has been dropped.
    pub fn mode(&self) -> CheckMode {
        if self.remote.is_some() {
            CheckMode::Remote
        } else if self.pre_verified {
            CheckMode::PreVerified(self.skip.date)
        } else {
            CheckMode::Local
        }
    }
}
