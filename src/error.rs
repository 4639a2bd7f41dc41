//! Application error types using thiserror
//!
//! Error hierarchy:
//! - MetadataError: Issues reading tracked dependencies from package.json
//! - VersionParseError: A version string without a usable major component
//! - CommandError: External tool could not be spawned or exited non-zero
//! - ConvergenceError: The upgrade loop stopped making progress
//! - ConfigError: Issues with the settings file or CLI values

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Project metadata related errors
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Version string could not be reduced to a major version
    #[error(transparent)]
    Version(#[from] VersionParseError),

    /// External command failures
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Convergence loop failures
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// A failing subprocess hands its own exit code through; everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Command(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Errors related to reading the project metadata (package.json)
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Failed to read the metadata file
    #[error("failed to read project metadata {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A tracked dependency is in neither dependencies nor devDependencies
    #[error("tracked dependency '{identifier}' not found in {path}")]
    MissingDependency { path: PathBuf, identifier: String },

    /// The dependency value is not a version string
    #[error("dependency '{identifier}' in {path} has a non-string version")]
    NotAString { path: PathBuf, identifier: String },
}

/// A version string that has no numeric major component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot derive a major version for '{identifier}' from '{raw}'")]
pub struct VersionParseError {
    /// Dependency the version belongs to
    pub identifier: String,
    /// The raw version string as found in the manifest
    pub raw: String,
}

/// Errors raised by external tool invocations
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started at all
    #[error("failed to execute `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("`{command}` exited with {}", display_code(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl CommandError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        CommandError::Failed {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// The rendered command line that failed
    pub fn command(&self) -> &str {
        match self {
            CommandError::SpawnFailed { command, .. } | CommandError::Failed { command, .. } => {
                command
            }
        }
    }

    /// Captured stderr, empty when the command inherited the terminal
    pub fn stderr(&self) -> &str {
        match self {
            CommandError::Failed { stderr, .. } => stderr,
            CommandError::SpawnFailed { .. } => "",
        }
    }

    /// Exit code to hand through to our own process
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Failed {
                code: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            _ => 1,
        }
    }
}

/// Errors raised when the upgrade loop cannot converge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvergenceError {
    /// A full pass advanced no dependency while some are still behind
    #[error("pass {pass} advanced no dependency; still pending: {}", .pending.join(", "))]
    NoProgress { pass: u32, pending: Vec<String> },

    /// More passes were needed than allowed
    #[error("dependencies did not converge within {limit} passes; still pending: {}", .pending.join(", "))]
    PassLimit { limit: u32, pending: Vec<String> },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("failed to read settings file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// A setting has an unusable value
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl MetadataError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetadataError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        MetadataError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingDependency error
    pub fn missing_dependency(path: impl Into<PathBuf>, identifier: impl Into<String>) -> Self {
        MetadataError::MissingDependency {
            path: path.into(),
            identifier: identifier.into(),
        }
    }
}

impl VersionParseError {
    /// Creates a new VersionParseError
    pub fn new(identifier: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            raw: raw.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
