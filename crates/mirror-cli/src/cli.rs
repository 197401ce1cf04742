//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mirror_core::{ErrorPolicy, MirrorConfig};

/// One-way folder synchronization: keep REPLICA identical to SOURCE
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to mirror from (never modified)
    pub source: PathBuf,

    /// Folder kept identical to the source (created if missing)
    pub replica: PathBuf,

    /// Seconds to wait between synchronization passes; 0 runs them back-to-back
    pub interval: u64,

    /// File that receives every log line in addition to the console
    pub log_file: PathBuf,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Log failed passes and retry after the interval instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Print each pass report as a JSON line on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> MirrorConfig {
        let error_policy = if self.keep_going {
            ErrorPolicy::KeepGoing
        } else {
            ErrorPolicy::FailFast
        };
        MirrorConfig::new(
            self.source.clone(),
            self.replica.clone(),
            Duration::from_secs(self.interval),
        )
        .with_error_policy(error_policy)
        .with_dry_run(self.dry_run)
    }
}
