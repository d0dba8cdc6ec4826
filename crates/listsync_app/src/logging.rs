//! Logging setup for the listsync host.
//!
//! The list itself is printed to stdout, so terminal logging goes to stderr
//! and the default is a log file next to the working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_LOG_FILE: &str = "listsync.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogDestination {
    #[default]
    File,
    /// stderr only.
    Terminal,
    Both,
}

impl LogDestination {
    fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Installs the global logger. Does nothing if one is already set.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_file: &Path) {
    let _ = CombinedLogger::init(loggers(destination, level, log_file));
}

fn loggers(
    destination: LogDestination,
    level: LevelFilter,
    log_file: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        if let Some(logger) = file_logger(level, config, log_file) {
            loggers.push(logger);
        }
    }
    loggers
}

fn file_logger(level: LevelFilter, config: Config, path: &Path) -> Option<Box<dyn SharedLogger>> {
    match File::create(path) {
        Ok(file) => {
            let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
            Some(logger)
        }
        Err(err) => {
            // Logging is not up yet.
            eprintln!("listsync: cannot create log file {}: {err}", path.display());
            None
        }
    }
}
