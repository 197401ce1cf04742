//! Runtime configuration for a mirror session

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// What the driver does when a pass fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the loop on the first failed pass
    #[default]
    FailFast,
    /// Log the failure, wait the interval and try again
    KeepGoing,
}

/// Settings for a mirror session, gathered once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Authoritative tree; never written to
    pub source: PathBuf,
    /// Tree made to match `source`
    pub replica: PathBuf,
    /// Pause between the end of one pass and the start of the next
    pub interval: Duration,
    pub error_policy: ErrorPolicy,
    /// Report planned actions without touching the replica
    pub dry_run: bool,
}

impl MirrorConfig {
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            interval,
            error_policy: ErrorPolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reject configurations that would make the replica overlap the source.
    ///
    /// A replica inside the source would be copied into itself on every pass,
    /// and a source inside the replica would be pruned. A missing source is
    /// not a configuration error; the first pass reports it.
    pub fn validate(&self) -> Result<()> {
        let source = resolve(&self.source)?;
        let replica = resolve(&self.replica)?;

        if source == replica {
            return Err(Error::invalid_config(format!(
                "source and replica are the same folder: {}",
                source.display()
            )));
        }
        if replica.starts_with(&source) {
            return Err(Error::invalid_config(format!(
                "replica {} is inside source {}",
                replica.display(),
                source.display()
            )));
        }
        if source.starts_with(&replica) {
            return Err(Error::invalid_config(format!(
                "source {} is inside replica {}",
                source.display(),
                replica.display()
            )));
        }
        Ok(())
    }
}

/// Absolute, symlink-free form of `path`, even if its tail does not exist yet.
///
/// The deepest existing ancestor is canonicalized and the missing components
/// are appended lexically.
fn resolve(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_config("empty path"));
    }
    let absolute = std::path::absolute(path)?;

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = if existing.exists() {
        dunce::canonicalize(existing)?
    } else {
        existing.to_path_buf()
    };
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(normalize(&resolved))
}

/// Collapse `.` and `..` components left over in the missing tail.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
