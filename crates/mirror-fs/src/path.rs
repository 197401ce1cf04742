//! Source/replica path correspondence

use std::ffi::OsStr;
use std::path::PathBuf;

/// A source path and the replica path that mirrors it.
///
/// Pairs are only ever built from the two tree roots and extended one name at
/// a time, so the replica side is always `replica_root` joined with the
/// source path's location relative to `source_root`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPair {
    pub source: PathBuf,
    pub replica: PathBuf,
}

impl PathPair {
    /// The pair formed by the two tree roots.
    pub fn root(source_root: impl Into<PathBuf>, replica_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source_root.into(),
            replica: replica_root.into(),
        }
    }

    /// Descend into a child entry with the same name on both sides.
    pub fn join(&self, name: impl AsRef<OsStr>) -> Self {
        let name = name.as_ref();
        Self {
            source: self.source.join(name),
            replica: self.replica.join(name),
        }
    }
}
