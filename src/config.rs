//! Run settings
//!
//! Settings are resolved once from CLI arguments and the optional
//! `majorstep.toml` in the project directory, then passed by reference to
//! every component. Nothing mutates them during a run.

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::runner::OutputMode;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Settings file looked up in the project directory
pub const SETTINGS_FILENAME: &str = "majorstep.toml";

/// Placeholder replaced by the target version in the branch template
const VERSION_PLACEHOLDER: &str = "{version}";

/// Contents of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Identifier prefix of tracked packages
    pub scope: String,
    /// Tracked package names below the scope, in pass order
    pub packages: Vec<String>,
    /// Working branch name, `{version}` is replaced by the target
    pub branch_template: String,
    /// Prefix of every commit message
    pub commit_label: String,
    /// Package manager executable
    pub installer: String,
    /// Framework updater argv; `<identifier>@<version>` is appended
    pub updater: Vec<String>,
    /// Command handed off to after convergence
    pub start_command: Vec<String>,
    /// Packages installed at the target version after convergence
    pub companions: Vec<String>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            scope: "@angular".to_string(),
            packages: vec!["cli".to_string(), "core".to_string(), "cdk".to_string()],
            branch_template: "team/ux/angular-v{version}".to_string(),
            commit_label: "Angular".to_string(),
            installer: "npm".to_string(),
            updater: vec!["ng".to_string(), "update".to_string(), "--force".to_string()],
            start_command: vec!["npm".to_string(), "start".to_string()],
            companions: vec!["primeng".to_string()],
        }
    }
}

impl FileSettings {
    /// Parse settings from TOML content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read settings from an explicit file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Read `majorstep.toml` from a directory, falling back to defaults when absent
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(SETTINGS_FILENAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Full identifiers of the tracked packages, in pass order
    pub fn identifiers(&self) -> Vec<String> {
        let scope = self.scope.trim_end_matches('/');
        self.packages
            .iter()
            .map(|pkg| {
                if scope.is_empty() {
                    pkg.clone()
                } else {
                    format!("{}/{}", scope, pkg)
                }
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.packages.is_empty() {
            return Err(ConfigError::invalid_value(
                "packages",
                "at least one package must be tracked",
            ));
        }
        let mut seen = HashSet::new();
        for pkg in &self.packages {
            if pkg.trim().is_empty() {
                return Err(ConfigError::invalid_value("packages", "empty package name"));
            }
            if !seen.insert(pkg) {
                return Err(ConfigError::invalid_value(
                    "packages",
                    format!("'{}' is listed more than once", pkg),
                ));
            }
        }
        if !self.branch_template.contains(VERSION_PLACEHOLDER) {
            return Err(ConfigError::invalid_value(
                "branch_template",
                format!("must contain {}", VERSION_PLACEHOLDER),
            ));
        }
        if self.installer.trim().is_empty() {
            return Err(ConfigError::invalid_value("installer", "must not be empty"));
        }
        if self.updater.is_empty() {
            return Err(ConfigError::invalid_value("updater", "must not be empty"));
        }
        if self.start_command.is_empty() {
            return Err(ConfigError::invalid_value("start_command", "must not be empty"));
        }
        Ok(())
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Project directory (package.json and git work tree)
    pub project_dir: PathBuf,
    /// Target major version
    pub target: u64,
    /// Whether external commands inherit the terminal
    pub verbose: bool,
    /// Whether to hand off to the start command after convergence
    pub start_after_install: bool,
    /// Explicit pass limit, defaults to the largest version gap
    pub max_passes: Option<u32>,
    /// Log commands instead of executing them
    pub dry_run: bool,
    /// Values from the settings file
    pub file: FileSettings,
}

impl Settings {
    /// Build settings with defaults for everything but the directory and target
    pub fn new(project_dir: impl Into<PathBuf>, target: u64) -> Self {
        Self {
            project_dir: project_dir.into(),
            target,
            verbose: false,
            start_after_install: false,
            max_passes: None,
            dry_run: false,
            file: FileSettings::default(),
        }
    }

    /// Resolve settings from CLI arguments and the settings file
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileSettings::from_file(path)?,
            None => FileSettings::from_dir(&args.path)?,
        };

        let settings = Self {
            project_dir: args.path.clone(),
            target: args.to_version,
            verbose: args.verbose,
            start_after_install: args.start_after_install,
            max_passes: args.max_passes,
            dry_run: args.dry_run,
            file,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the rest of the run relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target == 0 {
            return Err(ConfigError::invalid_value("to-version", "must be at least 1"));
        }
        if self.max_passes == Some(0) {
            return Err(ConfigError::invalid_value("max-passes", "must be at least 1"));
        }
        self.file.validate()
    }

    /// Default output mode for external commands
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_verbose(self.verbose)
    }

    /// Working branch for this target
    pub fn branch_name(&self) -> String {
        self.file
            .branch_template
            .replace(VERSION_PLACEHOLDER, &self.target.to_string())
    }

    /// Tracked identifiers in pass order
    pub fn identifiers(&self) -> Vec<String> {
        self.file.identifiers()
    }

    /// Commit message for the baseline and final clean-up commits
    pub fn migration_message(&self) -> String {
        format!("{} v{} - Migration", self.file.commit_label, self.target)
    }

    /// Commit message for a single upgrade step
    pub fn step_message(&self, identifier: &str, version: u64) -> String {
        format!(
            "{} v{} - Upgrading {} to {}",
            self.file.commit_label, self.target, identifier, version
        )
    }

    /// Commit message after installing a companion package
    pub fn companion_message(&self, package: &str) -> String {
        format!(
            "{} v{} - Upgrading {} to {}",
            self.file.commit_label, self.target, package, self.target
        )
    }
}
