//! Timestamp formatting and the append-only run log.
//!
//! The log has two sinks gated independently: stdout (gated by the
//! configured `verbose` flag) and a plain-text file (gated per call). The
//! file is opened in append-create mode for each write and closed when the
//! write returns; there is no locking, so concurrent writers may interleave
//! lines. That is accepted for a single-process pipeline's free-text log.
//!
//! Failures to append propagate to the caller; logging is best-effort and
//! the pipeline decides whether a failed append is worth stopping for.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::ConfigError;
use crate::registry::PipelineConfig;

/// Relative path of the run log file.
pub const DEFAULT_LOG_PATH: &str = "log.txt";

/// How a timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// `YYYY-MM-DD-HH-MM-SS`, safe to embed in a file name.
    FileName,
    /// `YYYY-MM-DD HH:MM:SS`, for banners and log lines.
    HumanReadable,
}

impl TimestampStyle {
    fn pattern(self) -> &'static str {
        match self {
            TimestampStyle::FileName => "%Y-%m-%d-%H-%M-%S",
            TimestampStyle::HumanReadable => "%Y-%m-%d %H:%M:%S",
        }
    }
}

/// Render a wall-clock instant in the given style.
pub fn format_timestamp(at: &DateTime<Local>, style: TimestampStyle) -> String {
    at.format(style.pattern()).to_string()
}

/// Render the current wall-clock time in the given style.
pub fn current_timestamp(style: TimestampStyle) -> String {
    format_timestamp(&Local::now(), style)
}

/// Boot banner line for the run log.
///
/// Kept pure (the stamp is an argument) so the shape is unit-testable.
pub fn boot_banner(stamp: &str) -> String {
    let rule = "=".repeat(20);
    format!("\n\n{rule}Boot at {stamp}{rule}")
}

/// Stdout rendering of a message: each piece followed by one space.
///
/// The trailing space is part of the contract; the newline is added by the
/// caller. Kept pure for the same reason as `boot_banner`.
pub fn echo_line(pieces: &[&str]) -> String {
    let mut line = String::new();
    for piece in pieces {
        line.push_str(piece);
        line.push(' ');
    }
    line
}

/// The run log: stdout echo plus an append-only file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    verbose: bool,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>, verbose: bool) -> Self {
        RunLog {
            path: path.into(),
            verbose,
        }
    }

    /// Log at the default path, echoing per the configured verbose flag.
    pub fn from_config(config: &PipelineConfig) -> Self {
        RunLog::new(DEFAULT_LOG_PATH, config.verbose)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the message pieces.
    ///
    /// If verbose, each piece goes to stdout followed by one space, then a
    /// newline. If `to_file`, the pieces go to the file concatenated with no
    /// separator, then a newline; the file is created on first append.
    pub fn emit(&self, pieces: &[&str], to_file: bool) -> Result<(), ConfigError> {
        if self.verbose {
            println!("{}", echo_line(pieces));
        }

        if to_file {
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)?;
            for piece in pieces {
                file.write_all(piece.as_bytes())?;
            }
            file.write_all(b"\n")?;
        }

        Ok(())
    }

    /// Append the boot banner to the log file.
    ///
    /// Always written to the file, whatever the verbose setting; the stdout
    /// echo still follows the verbose gate.
    pub fn announce_boot(&self) -> Result<(), ConfigError> {
        let banner = boot_banner(&current_timestamp(TimestampStyle::HumanReadable));
        self.emit(&[&banner], true)
    }
}
