//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root does not exist
    #[error("Source folder not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Source root exists but is not a directory
    #[error("Source is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    /// Configuration rejected before any sync work
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
