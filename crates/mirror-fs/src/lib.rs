//! Filesystem layer for folder-mirror
//!
//! Provides content fingerprints, source/replica path pairs and the small set
//! of filesystem mutations a sync pass performs.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{
    CHUNK_SIZE, Fingerprint, compute_content_fingerprint, content_equals, fingerprint,
};
pub use error::{Error, Result};
pub use io::{EntryKind, ListedEntry};
pub use path::PathPair;
