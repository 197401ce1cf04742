//! Event sink used by the binary

use std::time::Duration;

use mirror_core::{Error, EventSink, MirrorConfig, PassReport, SyncAction, TracingSink};

/// Logs through `tracing` and optionally prints pass reports as JSON lines.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    tracing: TracingSink,
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self {
            tracing: TracingSink,
            json,
        }
    }
}

impl EventSink for ConsoleSink {
    fn started(&self, config: &MirrorConfig) {
        self.tracing.started(config);
    }

    fn action(&self, action: &SyncAction, dry_run: bool) {
        self.tracing.action(action, dry_run);
    }

    fn pass_completed(&self, report: &PassReport, next_wait: Option<Duration>) {
        self.tracing.pass_completed(report, next_wait);
        if self.json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Could not serialize pass report: {}", e),
            }
        }
    }

    fn pass_failed(&self, error: &Error, stopping: bool) {
        self.tracing.pass_failed(error, stopping);
    }
}
