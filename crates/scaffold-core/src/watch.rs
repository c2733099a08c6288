//! Incremental watch driver
//!
//! A [`WatchSubscription`] wraps a filesystem watcher into a cancellable,
//! lazy sequence of change events. The driver consumes one event at a time,
//! synchronously, and re-runs the content pipeline for exactly the changed
//! file, using the same resolver and merge algorithm as a full sync, with no
//! access to any other file's destination.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, channel};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use scaffold_fs::NormalizedPath;

use crate::context::RunContext;
use crate::error::Result;
use crate::pipeline::{Outcome, process};

/// One filesystem change inside the watched tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path of the changed file
    pub path: NormalizedPath,
}

/// A cancellable subscription to filesystem changes under one root.
///
/// Iterating blocks until the next change arrives; after [`cancel`] the
/// remaining buffered events drain and the sequence ends.
///
/// [`cancel`]: WatchSubscription::cancel
pub struct WatchSubscription {
    watcher: Option<RecommendedWatcher>,
    rx: Receiver<notify::Result<Event>>,
    pending: VecDeque<NormalizedPath>,
}

impl WatchSubscription {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Fails when the platform watcher cannot be created or the root
    /// cannot be watched.
    pub fn subscribe(root: &NormalizedPath) -> Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(root.as_ref(), RecursiveMode::Recursive)?;
        debug!(root = %root, "watch subscription started");
        Ok(Self {
            watcher: Some(watcher),
            rx,
            pending: VecDeque::new(),
        })
    }

    /// Stop watching. Buffered events still drain through the iterator.
    pub fn cancel(&mut self) {
        if self.watcher.take().is_some() {
            debug!("watch subscription cancelled");
        }
    }

    fn enqueue(&mut self, event: Event) {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }
        for path in event.paths {
            if path.is_file() {
                self.pending.push_back(NormalizedPath::new(path));
            }
        }
    }
}

impl Iterator for WatchSubscription {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Some(ChangeEvent { path });
            }
            // Once the watcher is dropped the sender side closes and recv
            // errors out, ending the sequence.
            match self.rx.recv() {
                Ok(Ok(event)) => self.enqueue(event),
                Ok(Err(e)) => warn!(error = %e, "watch event error"),
                Err(_) => return None,
            }
        }
    }
}

/// Re-process a single changed file.
///
/// Returns `None` when the path lies outside the context's source tree;
/// such events are ignored. Processing file A never reads or writes a
/// destination belonging to file B.
pub fn handle_change(ctx: &RunContext, changed: &NormalizedPath) -> Option<Outcome> {
    let Some(record) = ctx.record_for(changed) else {
        debug!(path = %changed, "change outside source root ignored");
        return None;
    };
    debug!(file = %record.relative, "processing changed file");
    Some(process(ctx, &record))
}

/// Drive the pipeline from a sequence of change events.
///
/// Consumes events one at a time, synchronously; two invocations never
/// overlap against the same destination root. Returns the outcome of each
/// event that mapped into the source tree.
pub fn drive(
    ctx: &RunContext,
    events: impl IntoIterator<Item = ChangeEvent>,
) -> Vec<(NormalizedPath, Outcome)> {
    events
        .into_iter()
        .filter_map(|event| {
            handle_change(ctx, &event.path).map(|outcome| (event.path, outcome))
        })
        .collect()
}
