//! Filesystem operations performed by a sync pass

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use filetime::FileTime;

use crate::{Error, Result};

/// Kind of a directory entry. Symbolic links are reported as such, never
/// as what they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

impl EntryKind {
    fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// A single entry returned by [`list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

/// List a directory's entries sorted by name.
///
/// Entries are classified without following symbolic links.
pub fn list_dir(path: &Path) -> Result<Vec<ListedEntry>> {
    let read_dir = fs::read_dir(path).map_err(|e| Error::io(path, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        entries.push(ListedEntry {
            name: entry.file_name(),
            kind: EntryKind::from_file_type(file_type),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// What is at `path` itself, without following a final symbolic link.
///
/// Returns `None` if nothing is there.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(EntryKind::from_file_type(meta.file_type()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// What `path` resolves to after following symbolic links.
///
/// Returns `None` if nothing is there, including for a dangling link. Never
/// returns [`EntryKind::Symlink`].
pub fn target_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(_) => Ok(Some(EntryKind::File)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Whether anything exists at `path`.
///
/// Unlike [`Path::exists`], failures other than "not found" are reported
/// instead of being read as absence.
pub fn exists(path: &Path) -> Result<bool> {
    path.try_exists().map_err(|e| Error::io(path, e))
}

/// Create a directory and any missing parents.
///
/// Returns `true` if the directory did not exist before the call.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    if exists(path)? {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    Ok(true)
}

/// Copy `source` over `dest`, keeping permission bits and timestamps.
///
/// An existing `dest` is overwritten. Both file handles are released before
/// this returns.
pub fn copy_preserving(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|e| Error::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })?;

    let meta = fs::metadata(source).map_err(|e| Error::io(source, e))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dest, atime, mtime).map_err(|e| Error::io(dest, e))?;

    Ok(())
}

/// Remove a single file, or the link itself if `path` is a symbolic link.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}
