// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! A poll cycle never fails; these errors cover the owner side (config
//! loading, starting a task while one is in flight, joining the worker).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangecheckError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("A change check is already in flight")]
    AlreadyRunning,

    #[error("Change check worker failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ChangecheckError>;
