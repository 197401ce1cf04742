//! Error types for mirror-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mirror-core before the loop started
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// The sync loop ended on a failed pass
    #[error("synchronization stopped: {0}")]
    Stopped(#[source] mirror_core::Error),

    /// Log file could not be opened
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tracing subscriber setup failed
    #[error("logging setup failed: {message}")]
    Logging { message: String },
}

impl CliError {
    pub fn logging(message: impl ToString) -> Self {
        Self::Logging {
            message: message.to_string(),
        }
    }
}
