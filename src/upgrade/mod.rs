//! Upgrade workflow
//!
//! This module provides:
//! - Workflow coordination: read versions → branch → step passes → companions
//! - The repository gate keeping every step committed
//! - Step executors and the convergence loop
//! - Hand-off to the project's start command

mod convergence;
mod gate;
mod step;

pub use convergence::{ConvergenceLoop, LoopReport, StepRecord};
pub use gate::{BranchAction, RepositoryGate};
pub use step::{CommandStepExecutor, StepExecutor, StepOutcome};

use crate::config::Settings;
use crate::error::AppError;
use crate::logger;
use crate::manifest::read_version_table;
use crate::runner::CommandRunner;
use crate::tools::{FrameworkUpdater, Git, PackageInstaller};
use chrono::{DateTime, Utc};

/// Outcome of installing one companion package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionOutcome {
    /// Package spec that was installed, e.g. `primeng@12`
    pub spec: String,
    /// Whether the install succeeded
    pub installed: bool,
}

/// Result of a completed upgrade run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Target major version
    pub target: u64,
    /// Working branch the commits landed on
    pub branch: String,
    /// What the convergence loop did
    pub loop_report: LoopReport,
    /// Companion package installs
    pub companions: Vec<CompanionOutcome>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Returns true if any companion install failed
    pub fn has_companion_failures(&self) -> bool {
        self.companions.iter().any(|c| !c.installed)
    }
}

/// Coordinates a full upgrade run
pub struct Upgrade<'a> {
    settings: &'a Settings,
    runner: &'a dyn CommandRunner,
}

impl<'a> Upgrade<'a> {
    /// Create an upgrade over the given settings and command runner
    pub fn new(settings: &'a Settings, runner: &'a dyn CommandRunner) -> Self {
        Self { settings, runner }
    }

    fn installer(&self) -> PackageInstaller<'a> {
        PackageInstaller::new(
            self.runner,
            self.settings.file.installer.clone(),
            self.settings.output_mode(),
        )
    }

    fn gate(&self) -> RepositoryGate<'a> {
        RepositoryGate::new(Git::new(self.runner, self.settings.output_mode()))
    }

    fn executor(&self) -> CommandStepExecutor<'a> {
        CommandStepExecutor::new(
            self.settings,
            FrameworkUpdater::new(
                self.runner,
                self.settings.file.updater.clone(),
                self.settings.output_mode(),
            ),
            self.installer(),
            self.gate(),
        )
    }

    /// Run the upgrade workflow.
    ///
    /// Metadata and version errors surface before any external command runs.
    pub fn run(&self) -> Result<RunReport, AppError> {
        let started_at = Utc::now();
        let settings = self.settings;
        let label = &settings.file.commit_label;

        logger::debug(format!("Upgrading {}", label));
        let mut table = read_version_table(&settings.project_dir, &settings.identifiers())?;
        for record in table.records() {
            logger::debug(format!(
                "Tracking {} at v{}",
                record.identifier, record.current_version
            ));
        }

        let convergence = ConvergenceLoop::new(settings.target, settings.max_passes);
        let loop_report = convergence.run(&mut table, &mut self.executor())?;
        logger::success(format!("{} upgraded to {}", label, settings.target));

        let gate = self.gate();
        gate.commit_if_dirty(&settings.migration_message())?;

        let companions = self.upgrade_companions(&gate);

        Ok(RunReport {
            target: settings.target,
            branch: settings.branch_name(),
            loop_report,
            companions,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Install companion packages at the target version.
    ///
    /// A failed install is logged and does not abort the run.
    fn upgrade_companions(&self, gate: &RepositoryGate<'_>) -> Vec<CompanionOutcome> {
        let installer = self.installer();
        let target = self.settings.target;

        self.settings
            .file
            .companions
            .iter()
            .map(|package| {
                let spec = format!("{}@{}", package, target);
                logger::debug(format!("Upgrading {} to {}", package, target));

                let result = installer.install(&spec).and_then(|_| {
                    gate.commit_if_dirty(&self.settings.companion_message(package))
                });
                let installed = match result {
                    Ok(_) => true,
                    Err(e) => {
                        logger::error(format!("Error while upgrading {}: {}", package, e));
                        false
                    }
                };
                CompanionOutcome { spec, installed }
            })
            .collect()
    }

    /// Hand the terminal to the configured start command until it exits
    pub fn start(&self) -> Result<(), AppError> {
        let argv = &self.settings.file.start_command;
        logger::info(format!("Starting the project: {}", argv.join(" ")));
        self.installer().start(argv)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvergenceError, MetadataError};
    use crate::runner::fake::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    fn project(package_json: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), package_json).unwrap();
        dir
    }

    fn angular_project(cli: &str, core: &str, cdk: &str) -> TempDir {
        project(&format!(
            r#"{{
                "dependencies": {{ "@angular/core": "{core}", "@angular/cdk": "{cdk}" }},
                "devDependencies": {{ "@angular/cli": "{cli}" }}
            }}"#
        ))
    }

    #[test]
    fn test_full_run_from_eleven_to_twelve() {
        let dir = angular_project("^11.2.0", "^11.2.14", "^11.2.13");
        let settings = Settings::new(dir.path(), 12);
        let runner = ScriptedRunner::new().fail_on("git rev-parse", 1);

        let report = Upgrade::new(&settings, &runner).run().unwrap();

        assert_eq!(report.loop_report.passes, 1);
        assert_eq!(report.loop_report.step_count(), 3);
        assert_eq!(report.branch, "team/ux/angular-v12");
        assert_eq!(
            report.companions,
            vec![CompanionOutcome {
                spec: "primeng@12".to_string(),
                installed: true
            }]
        );
        assert!(report.elapsed() >= chrono::Duration::zero());

        let updates: Vec<String> = runner
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("ng update"))
            .collect();
        assert_eq!(
            updates,
            vec![
                "ng update --force @angular/cli@12",
                "ng update --force @angular/core@12",
                "ng update --force @angular/cdk@12",
            ]
        );
        assert_eq!(runner.count_prefix("npm install primeng@12"), 1);
    }

    #[test]
    fn test_version_error_happens_before_any_command() {
        let dir = angular_project("^11.2.0", "latest", "^11.2.13");
        let settings = Settings::new(dir.path(), 12);
        let runner = ScriptedRunner::new();

        let err = Upgrade::new(&settings, &runner).run().unwrap_err();
        assert!(matches!(err, AppError::Version(_)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_metadata_error_happens_before_any_command() {
        let dir = project(r#"{ "dependencies": { "@angular/core": "^11.0.0" } }"#);
        let settings = Settings::new(dir.path(), 12);
        let runner = ScriptedRunner::new();

        let err = Upgrade::new(&settings, &runner).run().unwrap_err();
        assert!(matches!(
            err,
            AppError::Metadata(MetadataError::MissingDependency { .. })
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_updater_failure_aborts_with_its_exit_code() {
        let dir = angular_project("^10.0.0", "^10.0.0", "^10.0.0");
        let settings = Settings::new(dir.path(), 12);
        let runner = ScriptedRunner::new().fail_on("ng update --force @angular/core@11", 42);

        let err = Upgrade::new(&settings, &runner).run().unwrap_err();
        assert_eq!(err.exit_code(), 42);
        // cli was stepped, core failed, cdk never attempted
        assert_eq!(runner.count_prefix("ng update --force @angular/cli@11"), 1);
        assert_eq!(runner.count_prefix("ng update --force @angular/cdk"), 0);
        assert_eq!(runner.count_prefix("npm install primeng"), 0);
    }

    #[test]
    fn test_companion_failure_is_not_fatal() {
        let dir = angular_project("^12.0.0", "^12.0.0", "^11.0.0");
        let settings = Settings::new(dir.path(), 12);
        let runner = ScriptedRunner::new().fail_on("npm install primeng", 1);

        let report = Upgrade::new(&settings, &runner).run().unwrap();
        assert!(report.has_companion_failures());
        assert_eq!(report.loop_report.step_count(), 1);
    }

    #[test]
    fn test_already_converged_project() {
        let dir = angular_project("^12.1.0", "^12.1.0", "^12.1.0");
        let mut settings = Settings::new(dir.path(), 12);
        settings.file.companions.clear();
        let runner = ScriptedRunner::new();

        let report = Upgrade::new(&settings, &runner).run().unwrap();
        assert_eq!(report.loop_report.passes, 0);
        assert_eq!(runner.count_prefix("ng update"), 0);
        // Branch checkout, baseline reconcile and the two clean-tree checks still run
        assert_eq!(runner.count_prefix("git checkout team/ux/angular-v12"), 1);
        assert_eq!(runner.count_prefix("git status"), 2);
    }

    #[test]
    fn test_explicit_pass_limit_surfaces() {
        let dir = angular_project("^10.0.0", "^10.0.0", "^10.0.0");
        let mut settings = Settings::new(dir.path(), 12);
        settings.max_passes = Some(1);
        let runner = ScriptedRunner::new();

        let err = Upgrade::new(&settings, &runner).run().unwrap_err();
        assert!(matches!(
            err,
            AppError::Convergence(ConvergenceError::PassLimit { limit: 1, .. })
        ));
    }

    #[test]
    fn test_start_hands_off_with_inherited_terminal() {
        let settings = Settings::new(".", 12);
        let runner = ScriptedRunner::new();
        Upgrade::new(&settings, &runner).start().unwrap();
        assert_eq!(runner.calls(), vec!["npm start"]);
    }

    #[test]
    fn test_start_failure_propagates() {
        let settings = Settings::new(".", 12);
        let runner = ScriptedRunner::new().fail_on("npm start", 9);
        let err = Upgrade::new(&settings, &runner).start().unwrap_err();
        assert_eq!(err.exit_code(), 9);
    }
}
