//! folder-mirror CLI
//!
//! Keeps a replica folder identical to a source folder, re-checking on a
//! fixed interval and logging every change to the console and a log file.

mod cli;
mod error;
mod logging;
mod report;

use clap::Parser;
use colored::Colorize;
use mirror_core::{Driver, run_once};

use cli::Cli;
use error::{CliError, Result};
use report::ConsoleSink;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;

    // Held until return so buffered log lines reach the file before exit
    let _log_guard = logging::init(&cli.log_file, cli.verbose)?;
    tracing::debug!(log_file = %cli.log_file.display(), "Logging initialised");

    let sink = ConsoleSink::new(cli.json);
    if cli.once {
        run_once(&config, &sink).map_err(CliError::Stopped)?;
        return Ok(());
    }

    let error = Driver::new(config, sink).run();
    Err(CliError::Stopped(error))
}
