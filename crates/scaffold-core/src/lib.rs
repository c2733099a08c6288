//! Synchronization pipeline for Scaffold Manager
//!
//! This crate coordinates the leaf crates into the scaffold synchronization
//! engine:
//!
//! - **RunContext**: per-invocation state (roots, rule table, merge mode,
//!   transform) constructed once and passed everywhere; no process-wide
//!   cache.
//! - **Content Pipeline**: per-file decision engine applying the resolved
//!   policy (overwrite, skip, rename, relocate, transform, merge) with
//!   atomic writes and partial-failure isolation.
//! - **Dependency Sync**: one-directional, strictly additive manifest
//!   synchronizer invoked once per run.
//! - **Incremental Watch Driver**: re-entrant single-file re-processing
//!   fed by a cancellable filesystem-watch subscription.
//!
//! # Architecture
//!
//! ```text
//!            calling orchestrator
//!                     |
//!               scaffold-core
//!                     |
//!        +------------+------------+
//!        |            |            |
//!   scaffold-fs scaffold-policy scaffold-content
//! ```

pub mod context;
pub mod deps;
pub mod error;
pub mod pipeline;
pub mod watch;

pub use context::RunContext;
pub use deps::{SyncReport, sync_dependencies};
pub use error::{Error, Result};
pub use pipeline::{Outcome, ProcessedFile, RunSummary, process, sync_all};
pub use watch::{ChangeEvent, WatchSubscription, drive, handle_change};
