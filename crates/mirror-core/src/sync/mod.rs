//! Reconciliation of a replica tree against its source
//!
//! - **reconciler**: the two-phase propagate/prune pass
//! - **report**: actions decided during a pass and the per-pass summary

mod reconciler;
mod report;

pub use reconciler::{ReconcileOptions, Reconciler};
pub use report::{ActionKind, CopyReason, PassReport, SyncAction};
