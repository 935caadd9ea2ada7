// src/config/mod.rs

//! Watch-list configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file through a [`FileSystem`](crate::fs::FileSystem) (`loader.rs`).
//! - Validate and convert it into a [`Watchlist`](crate::engine::Watchlist) (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, PathConfig, PathEntry, RawConfigFile, RemoteConfig};
