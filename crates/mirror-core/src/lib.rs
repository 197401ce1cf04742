//! Core engine for folder-mirror
//!
//! Keeps a replica directory identical to a source directory:
//!
//! - **Reconciler**: one stateless pass that creates missing directories,
//!   copies new or changed files and prunes files gone from the source
//! - **Driver**: repeats passes on a fixed interval, stopping on the first
//!   failure unless told to keep going
//! - **EventSink**: the logging capability both report through
//!
//! # Architecture
//!
//! ```text
//!        mirror-cli
//!            |
//!       mirror-core   (Driver -> Reconciler)
//!            |
//!        mirror-fs    (fingerprints, path pairs, fs primitives)
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod sync;

pub use config::{ErrorPolicy, MirrorConfig};
pub use driver::{Driver, DriverState, Pause, ThreadPause, run_once};
pub use error::{Error, Result};
pub use events::{EventSink, MemorySink, RecordedEvent, TracingSink};
pub use sync::{ActionKind, CopyReason, PassReport, ReconcileOptions, Reconciler, SyncAction};
