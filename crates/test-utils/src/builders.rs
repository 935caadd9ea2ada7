#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use changecheck::types::{ModDate, RemoteProfile, SkipDisposition, SkipState, TrackedPath};

/// Builder for `TrackedPath` to simplify test setup.
pub struct TrackedPathBuilder {
    tracked: TrackedPath,
}

impl TrackedPathBuilder {
    /// A local path with an unknown expected date.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            tracked: TrackedPath::new(path, ModDate::invalid()),
        }
    }

    pub fn expected(mut self, date: ModDate) -> Self {
        self.tracked.expected = date;
        self
    }

    pub fn skip(mut self, disposition: SkipDisposition, date: ModDate) -> Self {
        self.tracked.skip = SkipState::new(disposition, date);
        self
    }

    pub fn unavailable(self) -> Self {
        self.skip(SkipDisposition::Unavailable, ModDate::invalid())
    }

    pub fn pre_verified(mut self, recorded: ModDate) -> Self {
        self.tracked.pre_verified = true;
        self.tracked.skip.date = recorded;
        self
    }

    pub fn remote(mut self, profile: &Arc<RemoteProfile>) -> Self {
        self.tracked.remote = Some(Arc::downgrade(profile));
        self
    }

    /// A remote reference whose profile no longer exists.
    pub fn dangling_remote(mut self) -> Self {
        self.tracked.remote = Some(Weak::new());
        self
    }

    pub fn build(self) -> TrackedPath {
        self.tracked
    }
}

pub fn remote_profile(name: &str) -> Arc<RemoteProfile> {
    Arc::new(RemoteProfile {
        name: name.to_string(),
        url: format!("sftp://{name}.example.org"),
    })
}
