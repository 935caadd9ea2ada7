// src/lib.rs

pub mod check;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::engine::{PollOptions, PollRuntime, StdoutReporter, Watchlist};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading into a watch list
/// - the polling runtime and its change checker
/// - stdout reporting
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(fs.as_ref(), &config_path)?;
    let watchlist = cfg.to_watchlist(&config_root_dir(&config_path));

    if args.dry_run {
        print_dry_run(&watchlist);
        return Ok(());
    }

    let interval_ms = args.interval_ms.unwrap_or(cfg.config().interval_ms);
    let options = PollOptions {
        interval: Duration::from_millis(interval_ms),
        once: args.once,
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let runtime = PollRuntime::new(fs, watchlist, StdoutReporter, options);
    runtime.run(shutdown).await?;
    Ok(())
}

/// Directory relative tracked paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "configs/Changecheck.toml"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current working
///   directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn print_dry_run(watchlist: &Watchlist) {
    println!("changecheck dry-run");
    println!();

    println!("remote profiles ({}):", watchlist.profiles().len());
    for profile in watchlist.profiles() {
        println!("  - {} ({})", profile.name, profile.url);
    }
    println!();

    println!("tracked paths ({}):", watchlist.len());
    for tracked in watchlist.paths() {
        println!("  - {}", tracked.path.display());
        println!("      expected: {}", tracked.expected);
        println!("      mode: {:?}", tracked.mode());
        if tracked.skip != Default::default() {
            println!(
                "      skip: {:?} at {}",
                tracked.skip.disposition, tracked.skip.date
            );
        }
    }

    debug!("dry-run complete (no checks run)");
}
