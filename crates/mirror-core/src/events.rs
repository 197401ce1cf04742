//! Logging capability used by the reconciler and driver
//!
//! The engine never talks to a logger directly. It reports what happened to an
//! [`EventSink`] handed in by the caller: [`TracingSink`] turns events into
//! `tracing` records for the process-wide subscriber, [`MemorySink`] keeps
//! them for inspection.

use std::sync::Mutex;
use std::time::Duration;

use crate::Error;
use crate::config::MirrorConfig;
use crate::sync::{PassReport, SyncAction};

/// Receiver for everything a mirror session wants to log.
pub trait EventSink {
    /// The session is about to start its first pass.
    fn started(&self, _config: &MirrorConfig) {}

    /// An action was applied (or planned, when `dry_run`).
    fn action(&self, action: &SyncAction, dry_run: bool);

    /// A pass finished. `next_wait` is `None` when no further pass follows.
    fn pass_completed(&self, report: &PassReport, next_wait: Option<Duration>);

    /// A pass failed. `stopping` tells whether the session ends because of it.
    fn pass_failed(&self, error: &Error, stopping: bool);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn started(&self, config: &MirrorConfig) {
        (**self).started(config)
    }

    fn action(&self, action: &SyncAction, dry_run: bool) {
        (**self).action(action, dry_run)
    }

    fn pass_completed(&self, report: &PassReport, next_wait: Option<Duration>) {
        (**self).pass_completed(report, next_wait)
    }

    fn pass_failed(&self, error: &Error, stopping: bool) {
        (**self).pass_failed(error, stopping)
    }
}

/// Text logged when a pass completes.
pub fn completion_message(report: &PassReport, next_wait: Option<Duration>) -> String {
    let head = if report.pass > 0 {
        format!("Synchronization pass {} completed: {}.", report.pass, report.summary())
    } else {
        format!("Synchronization completed: {}.", report.summary())
    };
    match next_wait {
        Some(wait) => format!(
            "{} Waiting {} seconds for the next run.",
            head,
            wait.as_secs()
        ),
        None => head,
    }
}

/// Text logged when a pass fails.
pub fn failure_message(error: &Error, stopping: bool) -> String {
    if stopping {
        format!("An error occurred: {}. Stopping synchronization.", error)
    } else {
        format!("An error occurred: {}. Retrying after the interval.", error)
    }
}

/// Forwards events to `tracing` at info level, failures at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn started(&self, config: &MirrorConfig) {
        tracing::info!(
            source = %config.source.display(),
            replica = %config.replica.display(),
            interval_secs = config.interval.as_secs(),
            dry_run = config.dry_run,
            "Starting folder synchronization..."
        );
    }

    fn action(&self, action: &SyncAction, dry_run: bool) {
        tracing::info!("{}", action.describe(dry_run));
    }

    fn pass_completed(&self, report: &PassReport, next_wait: Option<Duration>) {
        tracing::info!("{}", completion_message(report, next_wait));
        tracing::debug!(elapsed_ms = report.elapsed_ms, "pass timing");
    }

    fn pass_failed(&self, error: &Error, stopping: bool) {
        tracing::error!("{}", failure_message(error, stopping));
    }
}

/// An event captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Started,
    Action { action: SyncAction, dry_run: bool },
    Completed { report: PassReport, next_wait: Option<Duration> },
    Failed { message: String, stopping: bool },
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: RecordedEvent) {
        // A poisoned lock only means another thread panicked mid-push
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Only the action events, in order.
    pub fn actions(&self) -> Vec<SyncAction> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedEvent::Action { action, .. } => Some(action),
                _ => None,
            })
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl EventSink for MemorySink {
    fn started(&self, _config: &MirrorConfig) {
        self.push(RecordedEvent::Started);
    }

    fn action(&self, action: &SyncAction, dry_run: bool) {
        self.push(RecordedEvent::Action {
            action: action.clone(),
            dry_run,
        });
    }

    fn pass_completed(&self, report: &PassReport, next_wait: Option<Duration>) {
        self.push(RecordedEvent::Completed {
            report: report.clone(),
            next_wait,
        });
    }

    fn pass_failed(&self, error: &Error, stopping: bool) {
        self.push(RecordedEvent::Failed {
            message: error.to_string(),
            stopping,
        });
    }
}
