//! [`TestTree`] fixture for source/replica test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory containing `source/` and `replica/` side by side.
///
/// Only `source/` is created up front; the replica is left for the code under
/// test to create unless [`TestTree::with_replica`] is used.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("a/b.txt", "hello");
/// // ... run a sync pass from tree.source() to tree.replica() ...
/// tree.assert_replica_matches_source();
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create the temp directory with an empty `source/` folder.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    /// Like [`TestTree::new`] but with an empty `replica/` folder as well.
    pub fn with_replica() -> Self {
        let tree = Self::new();
        fs::create_dir(tree.replica()).unwrap();
        tree
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    /// Write a file under `source/`, creating parent folders.
    pub fn write_source(&self, rel: &str, content: impl AsRef<[u8]>) {
        write_file(&self.source().join(rel), content.as_ref());
    }

    /// Write a file under `replica/`, creating parent folders.
    pub fn write_replica(&self, rel: &str, content: impl AsRef<[u8]>) {
        write_file(&self.replica().join(rel), content.as_ref());
    }

    pub fn mkdir_source(&self, rel: &str) {
        fs::create_dir_all(self.source().join(rel)).unwrap();
    }

    pub fn mkdir_replica(&self, rel: &str) {
        fs::create_dir_all(self.replica().join(rel)).unwrap();
    }

    pub fn remove_source(&self, rel: &str) {
        let path = self.source().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(path).unwrap();
        } else {
            fs::remove_file(path).unwrap();
        }
    }

    pub fn read_replica(&self, rel: &str) -> String {
        let path = self.replica().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Every regular file under `root`, keyed by `/`-separated relative path.
    pub fn files(root: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        if root.exists() {
            collect(root, root, &mut files);
        }
        files
    }

    pub fn source_files(&self) -> BTreeMap<String, Vec<u8>> {
        Self::files(&self.source())
    }

    pub fn replica_files(&self) -> BTreeMap<String, Vec<u8>> {
        Self::files(&self.replica())
    }

    /// Assert that the replica holds exactly the source's files and bytes.
    ///
    /// # Panics
    /// Panics with a diff of the two file maps if they differ.
    pub fn assert_replica_matches_source(&self) {
        pretty_assertions::assert_eq!(
            self.replica_files(),
            self.source_files(),
            "replica does not mirror source"
        );
    }

    /// Assert that `rel` exists under `replica/`.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_replica_exists(&self, rel: &str) {
        let path = self.replica().join(rel);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that `rel` does **not** exist under `replica/`.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_replica_missing(&self, rel: &str) {
        let path = self.replica().join(rel);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(rel, fs::read(&path).unwrap());
        }
    }
}
