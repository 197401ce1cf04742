//! SHA-256 content fingerprints
//!
//! A fingerprint is the canonical `sha256:<hex>` digest of a file's bytes. Two
//! files are treated as content-identical when their fingerprints match.

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Number of bytes read per iteration while hashing a file.
pub const CHUNK_SIZE: usize = 4096;

/// Digest of a file's full byte content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    fn from_hasher(hasher: Sha256) -> Self {
        Self(format!("{}{:x}", PREFIX, hasher.finalize()))
    }

    /// The canonical `sha256:<hex>` representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of in-memory content.
pub fn compute_content_fingerprint(content: impl AsRef<[u8]>) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    Fingerprint::from_hasher(hasher)
}

/// Compute the fingerprint of a file by streaming it in [`CHUNK_SIZE`] reads.
///
/// Returns `Ok(None)` when the file does not exist, including when it
/// disappears between being listed and being read.
///
/// # Errors
///
/// Any I/O failure other than the file being missing.
pub fn fingerprint(path: &Path) -> Result<Option<Fingerprint>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(Some(Fingerprint::from_hasher(hasher)))
}

/// Whether two files have identical content.
///
/// A missing file never equals anything, not even another missing file.
/// Callers decide separately what to do about a missing replica.
pub fn content_equals(a: &Path, b: &Path) -> Result<bool> {
    match (fingerprint(a)?, fingerprint(b)?) {
        (Some(fa), Some(fb)) => Ok(fa == fb),
        _ => Ok(false),
    }
}
