//! Logger setup
//!
//! The terminal UI owns stdout and stderr, so interactive sessions only log
//! when a log file is given. Headless runs log to stderr. `RUST_LOG` overrides
//! the default filter in both cases.

use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Where log records go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Discard everything
    Off,
    /// Standard error, for headless runs
    Stderr,
}

/// Opens `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global logger
///
/// A log file takes precedence over `fallback`. Calling this twice keeps the
/// first logger.
pub fn init(log_file: Option<&Path>, fallback: LogOutput, default_filter: &str) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    match (log_file, fallback) {
        (Some(path), _) => {
            let file = open_log_file(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        (None, LogOutput::Stderr) => {
            builder.target(Target::Stderr);
        }
        (None, LogOutput::Off) => return Ok(()),
    }

    // Already initialised (e.g. by a test harness); keep the existing logger
    let _ = builder.try_init();
    Ok(())
}
