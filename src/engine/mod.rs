// src/engine/mod.rs

//! Execution of poll cycles off the owner's control flow.
//!
//! - [`task`] runs one cycle on Tokio's blocking pool ([`PollTask`]).
//! - [`checker`] is the owner-side handle that allows at most one task in
//!   flight ([`ChangeChecker`]).
//! - [`watchlist`] holds the owner's tracked paths and the acknowledgement
//!   policy applied between cycles.
//! - [`runtime`] is the polling loop used by the binary.
//!
//! Classification itself lives in [`crate::check`] and knows nothing about
//! threads or channels.

pub mod checker;
pub mod runtime;
pub mod task;
pub mod watchlist;

pub use checker::ChangeChecker;
pub use runtime::{format_event, PollOptions, PollRuntime, StdoutReporter};
pub use task::{CycleReport, InFlight, PollTask, TaskState};
pub use watchlist::Watchlist;
