// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `changecheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "changecheck",
    version,
    about = "Report tracked files that changed or disappeared since they were last seen.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the watch-list config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Changecheck.toml")]
    pub config: String,

    /// Run a single check, print the results and exit.
    #[arg(long)]
    pub once: bool,

    /// Override `[config].interval_ms`.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHANGECHECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the watch list, but don't check anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
