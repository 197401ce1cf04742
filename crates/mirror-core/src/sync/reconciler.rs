//! One-way reconciliation of a replica tree against a source tree
//!
//! A pass runs in two phases. Propagation walks the source top-down, creating
//! missing replica directories before anything inside them and copying every
//! file that is missing or different. Pruning then walks the replica and
//! removes files that no longer exist in the source. Directories are never
//! removed from the replica.
//!
//! Symbolic links are followed on the source side only. Inside the replica a
//! link is an entry of its own: it is unlinked where a directory or file has
//! to go, pruned like a file, and never written or walked through.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mirror_fs::{EntryKind, PathPair, content_equals, io};

use super::report::{CopyReason, PassReport, SyncAction};
use crate::config::MirrorConfig;
use crate::events::EventSink;
use crate::{Error, Result};

/// Options for a reconcile pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// If true, report actions without modifying the replica.
    /// Action descriptions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Makes a replica tree match a source tree, one pass at a time.
///
/// Holds no state between passes; every call to [`Reconciler::reconcile`]
/// derives the full diff from the filesystem.
#[derive(Debug, Clone)]
pub struct Reconciler {
    roots: PathPair,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(
        source_root: impl Into<PathBuf>,
        replica_root: impl Into<PathBuf>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            roots: PathPair::root(source_root, replica_root),
            options,
        }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(
            config.source.clone(),
            config.replica.clone(),
            ReconcileOptions {
                dry_run: config.dry_run,
            },
        )
    }

    /// Run one full pass: propagate, then prune.
    ///
    /// # Errors
    ///
    /// A missing source root, or any I/O failure other than a file vanishing
    /// while it is being fingerprinted, ends the pass with an error. Work
    /// already applied stays applied.
    pub fn reconcile(&self, sink: &dyn EventSink) -> Result<PassReport> {
        let started = Instant::now();
        let mut report = PassReport::new(self.options.dry_run);

        self.check_source()?;
        self.propagate(sink, &mut report)?;
        self.prune(sink, &mut report)?;

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(report)
    }

    fn check_source(&self) -> Result<()> {
        let source = &self.roots.source;
        match fs::metadata(source) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::SourceNotDirectory {
                path: source.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::SourceMissing {
                path: source.clone(),
            }),
            Err(e) => Err(mirror_fs::Error::io(source, e).into()),
        }
    }

    fn propagate(&self, sink: &dyn EventSink, report: &mut PassReport) -> Result<()> {
        if !self.roots.replica.is_dir() {
            self.apply(
                SyncAction::CreateDir {
                    path: self.roots.replica.clone(),
                },
                sink,
                report,
            )?;
        }
        self.propagate_dir(&self.roots, sink, report)
    }

    /// Mirror the contents of one source directory whose replica counterpart
    /// already exists (or, in dry-run mode, would exist).
    fn propagate_dir(
        &self,
        dir: &PathPair,
        sink: &dyn EventSink,
        report: &mut PassReport,
    ) -> Result<()> {
        for entry in io::list_dir(&dir.source)? {
            let child = dir.join(&entry.name);
            let kind = match entry.kind {
                EntryKind::Symlink => io::target_kind(&child.source)?,
                kind => Some(kind),
            };
            match kind {
                Some(EntryKind::Directory) => {
                    self.propagate_subdir(&child, sink, report)?;
                    self.propagate_dir(&child, sink, report)?;
                }
                Some(_) => self.propagate_file(child, sink, report)?,
                // Dangling source link: nothing to mirror
                None => {}
            }
        }
        Ok(())
    }

    fn propagate_subdir(
        &self,
        dir: &PathPair,
        sink: &dyn EventSink,
        report: &mut PassReport,
    ) -> Result<()> {
        match io::entry_kind(&dir.replica)? {
            Some(EntryKind::Directory) => return Ok(()),
            Some(EntryKind::Symlink) => self.unlink_replica(&dir.replica, sink, report)?,
            _ => {}
        }
        self.apply(
            SyncAction::CreateDir {
                path: dir.replica.clone(),
            },
            sink,
            report,
        )
    }

    fn propagate_file(
        &self,
        file: PathPair,
        sink: &dyn EventSink,
        report: &mut PassReport,
    ) -> Result<()> {
        let reason = match io::entry_kind(&file.replica)? {
            None => CopyReason::Missing,
            Some(EntryKind::Symlink) => {
                self.unlink_replica(&file.replica, sink, report)?;
                CopyReason::Missing
            }
            Some(_) if !content_equals(&file.source, &file.replica)? => CopyReason::Changed,
            Some(_) => {
                report.unchanged += 1;
                return Ok(());
            }
        };

        self.apply(
            SyncAction::CopyFile {
                source: file.source,
                replica: file.replica,
                reason,
            },
            sink,
            report,
        )
    }

    /// Remove a replica symbolic link standing where a real entry belongs.
    fn unlink_replica(
        &self,
        path: &Path,
        sink: &dyn EventSink,
        report: &mut PassReport,
    ) -> Result<()> {
        self.apply(
            SyncAction::RemoveFile {
                path: path.to_path_buf(),
            },
            sink,
            report,
        )
    }

    fn prune(&self, sink: &dyn EventSink, report: &mut PassReport) -> Result<()> {
        // Only reachable in dry-run mode, where propagation did not create it
        if !io::exists(&self.roots.replica)? {
            return Ok(());
        }
        self.prune_dir(&self.roots, sink, report)
    }

    fn prune_dir(&self, dir: &PathPair, sink: &dyn EventSink, report: &mut PassReport) -> Result<()> {
        for entry in io::list_dir(&dir.replica)? {
            let child = dir.join(&entry.name);
            match entry.kind {
                EntryKind::Directory => self.prune_dir(&child, sink, report)?,
                EntryKind::File | EntryKind::Symlink => {
                    if !io::exists(&child.source)? {
                        self.apply(SyncAction::RemoveFile { path: child.replica }, sink, report)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Perform an action (unless dry-run), then log and record it.
    fn apply(&self, action: SyncAction, sink: &dyn EventSink, report: &mut PassReport) -> Result<()> {
        if !self.options.dry_run {
            match &action {
                SyncAction::CreateDir { path } => {
                    io::ensure_dir(path)?;
                }
                SyncAction::CopyFile {
                    source, replica, ..
                } => io::copy_preserving(source, replica)?,
                SyncAction::RemoveFile { path } => io::remove_file(path)?,
            }
        }
        sink.action(&action, self.options.dry_run);
        report.actions.push(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use pretty_assertions::assert_eq;

    fn reconciler(source: &Path, replica: &Path) -> Reconciler {
        Reconciler::new(source, replica, ReconcileOptions::default())
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let err = reconciler(&dir.path().join("nope"), &dir.path().join("replica"))
            .reconcile(&sink)
            .unwrap_err();

        assert!(matches!(err, Error::SourceMissing { .. }));
        assert!(!dir.path().join("replica").exists(), "nothing is created on failure");
    }

    #[test]
    fn file_as_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let sink = MemorySink::new();

        let err = reconciler(&file, &dir.path().join("replica"))
            .reconcile(&sink)
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotDirectory { .. }));
    }

    #[test]
    fn creates_replica_root_first() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        let replica = dir.path().join("out").join("replica");
        let sink = MemorySink::new();

        let report = reconciler(&source, &replica).reconcile(&sink).unwrap();

        assert_eq!(
            report.actions,
            vec![
                SyncAction::CreateDir {
                    path: replica.clone()
                },
                SyncAction::CopyFile {
                    source: source.join("a.txt"),
                    replica: replica.join("a.txt"),
                    reason: CopyReason::Missing,
                },
            ]
        );
        assert_eq!(sink.actions(), report.actions);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("sub").join("a.txt"), "a").unwrap();
        let replica = dir.path().join("replica");
        let sink = MemorySink::new();

        let report = Reconciler::new(&source, &replica, ReconcileOptions { dry_run: true })
            .reconcile(&sink)
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.actions.len(), 3);
        assert!(!replica.exists());
    }

    #[test]
    fn replica_file_where_directory_belongs_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src");
        let replica = dir.path().join("replica");
        fs::create_dir_all(source.join("a")).unwrap();
        fs::create_dir_all(&replica).unwrap();
        fs::write(replica.join("a"), "not a dir").unwrap();
        let sink = MemorySink::new();

        let err = reconciler(&source, &replica).reconcile(&sink).unwrap_err();
        assert!(matches!(
            err,
            Error::Fs(mirror_fs::Error::NotADirectory { .. })
        ));
    }
}
