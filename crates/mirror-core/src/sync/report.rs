//! Actions taken during a pass and the per-pass report

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a file was copied into the replica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyReason {
    /// No file existed at the replica path
    Missing,
    /// The replica file's content differed from the source
    Changed,
}

/// A single filesystem mutation decided by the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    CreateDir {
        path: PathBuf,
    },
    CopyFile {
        source: PathBuf,
        replica: PathBuf,
        reason: CopyReason,
    },
    RemoveFile {
        path: PathBuf,
    },
}

/// Discriminant of [`SyncAction`], used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    CreateDir,
    CopyFile,
    RemoveFile,
}

impl SyncAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateDir { .. } => ActionKind::CreateDir,
            Self::CopyFile { .. } => ActionKind::CopyFile,
            Self::RemoveFile { .. } => ActionKind::RemoveFile,
        }
    }

    /// Human-readable log line for this action.
    ///
    /// Dry-run descriptions are prefixed with `[dry-run] Would`.
    pub fn describe(&self, dry_run: bool) -> String {
        if dry_run {
            format!("[dry-run] Would {}", self.verb_phrase())
        } else {
            self.to_string()
        }
    }

    fn verb_phrase(&self) -> String {
        match self {
            Self::CreateDir { path } => format!("create directory: {}", path.display()),
            Self::CopyFile {
                source, replica, ..
            } => format!("copy file: {} -> {}", source.display(), replica.display()),
            Self::RemoveFile { path } => format!("remove file: {}", path.display()),
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path } => write!(f, "Created directory: {}", path.display()),
            Self::CopyFile {
                source,
                replica,
                reason: CopyReason::Missing,
            } => write!(f, "Copied file: {} -> {}", source.display(), replica.display()),
            Self::CopyFile {
                source,
                replica,
                reason: CopyReason::Changed,
            } => write!(f, "Updated file: {} -> {}", source.display(), replica.display()),
            Self::RemoveFile { path } => write!(f, "Removed file: {}", path.display()),
        }
    }
}

/// Outcome of one reconcile pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Sequence number assigned by the driver; 0 outside a driver loop
    pub pass: u64,
    /// Whether the pass only simulated its actions
    pub dry_run: bool,
    /// Actions taken (or planned, in dry-run mode) in the order they happened
    pub actions: Vec<SyncAction>,
    /// Source files whose replica copy was already identical
    pub unchanged: usize,
    /// Wall-clock duration of the pass
    pub elapsed_ms: u64,
}

impl PassReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// True if the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }

    /// One-line summary such as `2 directories created, 5 files copied, 1 file removed`.
    pub fn summary(&self) -> String {
        if self.is_noop() {
            return format!("nothing to do ({} files up to date)", self.unchanged);
        }

        let dirs = self.count(ActionKind::CreateDir);
        let copied = self.count(ActionKind::CopyFile);
        let removed = self.count(ActionKind::RemoveFile);
        let verb = if self.dry_run { "to be " } else { "" };

        let mut parts = Vec::new();
        if dirs > 0 {
            parts.push(format!("{} {verb}created", plural(dirs, "directory", "directories")));
        }
        if copied > 0 {
            parts.push(format!("{} {verb}copied", plural(copied, "file", "files")));
        }
        if removed > 0 {
            parts.push(format!("{} {verb}removed", plural(removed, "file", "files")));
        }
        parts.push(format!("{} unchanged", self.unchanged));
        parts.join(", ")
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}
