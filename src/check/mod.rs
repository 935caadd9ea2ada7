// src/check/mod.rs

//! Change classification for one poll cycle.
//!
//! This is the pure core: it reads the tracked paths, stats local files
//! through a [`FileSystem`](crate::fs::FileSystem) and produces a
//! [`ResultBatch`]. It has no channels, no threads and never fails.
//!
//! - [`cycle`] decides the outcome for each tracked path.
//! - [`batch`] aggregates outcomes in encounter order.

pub mod batch;
pub mod cycle;

pub use batch::ResultBatch;
pub use cycle::{classify, run_cycle, run_cycle_until, Outcome};
