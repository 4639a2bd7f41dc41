//! Console logging with a fixed severity vocabulary
//!
//! Every line is `[majorstep] <message>` printed entirely in the severity
//! colour: error (red), debug (yellow), info (blue), success (green).
//! Errors go to stderr, everything else to stdout.

use colored::{ColoredString, Colorize};
use std::fmt::Display;

/// Tag prepended to every log line
const TAG: &str = "[majorstep]";

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal or notable failures
    Error,
    /// Step-by-step detail (commands being run, options)
    Debug,
    /// Progress milestones
    Info,
    /// Completed operations
    Success,
}

impl Severity {
    /// Returns the lowercase label for this severity
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }

    fn paint(&self, line: &str) -> ColoredString {
        match self {
            Severity::Error => line.red(),
            Severity::Debug => line.yellow(),
            Severity::Info => line.blue(),
            Severity::Success => line.green(),
        }
    }
}

/// Render a log line for the given severity
pub fn format_line(severity: Severity, message: impl Display) -> String {
    severity
        .paint(&format!("{} - {}", TAG, message))
        .to_string()
}

/// Print a log line with the given severity
pub fn log(severity: Severity, message: impl Display) {
    let line = format_line(severity, message);
    match severity {
        Severity::Error => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

/// Log at `error` severity
pub fn error(message: impl Display) {
    log(Severity::Error, message);
}

/// Log at `debug` severity
pub fn debug(message: impl Display) {
    log(Severity::Debug, message);
}

/// Log at `info` severity
pub fn info(message: impl Display) {
    log(Severity::Info, message);
}

/// Log at `success` severity
pub fn success(message: impl Display) {
    log(Severity::Success, message);
}
