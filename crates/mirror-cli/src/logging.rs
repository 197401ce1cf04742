//! Log sink wiring: every record goes to the console and to the log file

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Local timestamp with millisecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Keeps the background file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// The log file is opened in append mode and its parent folder created if
/// needed. `RUST_LOG` overrides the default level.
pub fn init(log_file: &Path, verbose: bool) -> Result<LogGuard> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CliError::LogFile {
                path: log_file.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| CliError::LogFile {
            path: log_file.to_path_buf(),
            source: e,
        })?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let timer = ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(timer.clone());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(timer);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(CliError::logging)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(CliError::logging)?;

    Ok(LogGuard { _guard: guard })
}
