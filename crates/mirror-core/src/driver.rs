//! Interval loop around the reconciler
//!
//! The driver is a two-state machine. It stays [`DriverState::Running`] while
//! passes succeed and moves to [`DriverState::Stopped`] on the first failure
//! under [`ErrorPolicy::FailFast`]. That transition is the only way out.

use std::time::Duration;

use crate::config::{ErrorPolicy, MirrorConfig};
use crate::events::EventSink;
use crate::sync::{PassReport, Reconciler};
use crate::{Error, Result};

/// Lifecycle of a [`Driver`]
#[derive(Debug)]
pub enum DriverState {
    Running,
    Stopped(Error),
}

impl DriverState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Waits between passes.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the calling thread; a zero interval returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Runs reconcile passes on a fixed interval.
pub struct Driver<S: EventSink, P: Pause = ThreadPause> {
    config: MirrorConfig,
    reconciler: Reconciler,
    sink: S,
    pause: P,
    state: DriverState,
    passes: u64,
}

impl<S: EventSink> Driver<S, ThreadPause> {
    pub fn new(config: MirrorConfig, sink: S) -> Self {
        Self::with_pause(config, sink, ThreadPause)
    }
}

impl<S: EventSink, P: Pause> Driver<S, P> {
    pub fn with_pause(config: MirrorConfig, sink: S, pause: P) -> Self {
        Self {
            reconciler: Reconciler::from_config(&config),
            config,
            sink,
            pause,
            state: DriverState::Running,
            passes: 0,
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Number of passes attempted so far, failed ones included.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Attempt one pass and apply the resulting transition.
    ///
    /// A successful pass is followed by the interval wait. A stopped driver
    /// stays stopped and does no work.
    pub fn step(&mut self) -> &DriverState {
        if !self.state.is_running() {
            return &self.state;
        }

        self.passes += 1;
        match self.reconciler.reconcile(&self.sink) {
            Ok(mut report) => {
                report.pass = self.passes;
                self.sink.pass_completed(&report, Some(self.config.interval));
                self.pause.pause(self.config.interval);
            }
            Err(error) => match self.config.error_policy {
                ErrorPolicy::FailFast => {
                    self.sink.pass_failed(&error, true);
                    self.state = DriverState::Stopped(error);
                }
                ErrorPolicy::KeepGoing => {
                    self.sink.pass_failed(&error, false);
                    self.pause.pause(self.config.interval);
                }
            },
        }
        &self.state
    }

    /// Loop until the driver stops and return the error that stopped it.
    ///
    /// Under [`ErrorPolicy::KeepGoing`] this never returns.
    pub fn run(mut self) -> Error {
        self.sink.started(&self.config);
        loop {
            self.step();
            if let DriverState::Stopped(error) =
                std::mem::replace(&mut self.state, DriverState::Running)
            {
                return error;
            }
        }
    }
}

/// Run a single pass outside the loop and report its outcome.
pub fn run_once(config: &MirrorConfig, sink: &dyn EventSink) -> Result<PassReport> {
    sink.started(config);
    match Reconciler::from_config(config).reconcile(sink) {
        Ok(mut report) => {
            report.pass = 1;
            sink.pass_completed(&report, None);
            Ok(report)
        }
        Err(error) => {
            sink.pass_failed(&error, true);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MemorySink, RecordedEvent};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct CountingPause {
        waits: Vec<Duration>,
    }

    impl Pause for CountingPause {
        fn pause(&mut self, duration: Duration) {
            self.waits.push(duration);
        }
    }

    fn config_for(dir: &std::path::Path) -> MirrorConfig {
        MirrorConfig::new(
            dir.join("src"),
            dir.join("replica"),
            Duration::from_secs(7),
        )
    }

    #[test]
    fn successful_step_stays_running_and_waits() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        let sink = MemorySink::new();
        let mut driver =
            Driver::with_pause(config_for(dir.path()), &sink, CountingPause::default());

        assert!(driver.step().is_running());
        assert!(driver.step().is_running());

        assert_eq!(driver.passes(), 2);
        assert_eq!(driver.pause.waits, vec![Duration::from_secs(7); 2]);
        let completed: Vec<u64> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::Completed { report, .. } => Some(report.pass),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![1, 2]);
    }

    #[test]
    fn failure_stops_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let mut driver =
            Driver::with_pause(config_for(dir.path()), &sink, CountingPause::default());

        let state = driver.step();
        assert!(matches!(state, DriverState::Stopped(Error::SourceMissing { .. })));
        assert!(driver.pause.waits.is_empty());

        // Stopped is terminal
        driver.step();
        assert_eq!(driver.passes(), 1);
    }

    #[test]
    fn keep_going_retries_after_interval() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let config = config_for(dir.path()).with_error_policy(ErrorPolicy::KeepGoing);
        let mut driver = Driver::with_pause(config, &sink, CountingPause::default());

        assert!(driver.step().is_running());
        std::fs::create_dir(dir.path().join("src")).unwrap();
        assert!(driver.step().is_running());

        assert_eq!(driver.pause.waits.len(), 2);
        let events = sink.events();
        assert!(matches!(
            events[0],
            RecordedEvent::Failed {
                stopping: false,
                ..
            }
        ));
        assert!(matches!(events.last(), Some(RecordedEvent::Completed { .. })));
    }

    #[test]
    fn run_returns_the_stopping_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let driver = Driver::with_pause(config_for(dir.path()), &sink, CountingPause::default());

        let error = driver.run();

        assert!(matches!(error, Error::SourceMissing { .. }));
        let events = sink.events();
        assert_eq!(events.first(), Some(&RecordedEvent::Started));
        assert!(matches!(
            events.last(),
            Some(RecordedEvent::Failed { stopping: true, .. })
        ));
    }

    #[test]
    fn run_once_reports_without_wait() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src").join("f.txt"), "f").unwrap();
        let sink = MemorySink::new();

        let report = run_once(&config_for(dir.path()), &sink).unwrap();

        assert_eq!(report.pass, 1);
        assert!(matches!(
            sink.events().last(),
            Some(RecordedEvent::Completed {
                next_wait: None,
                ..
            })
        ));
    }

    #[test]
    fn zero_interval_thread_pause_returns_immediately() {
        let start = std::time::Instant::now();
        ThreadPause.pause(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
