//! Single upgrade steps
//!
//! A step moves exactly one dependency up by exactly one major version:
//! run the framework updater, reconcile peer dependencies, commit, then
//! record the new version in the table.

use super::gate::RepositoryGate;
use crate::config::Settings;
use crate::domain::VersionTable;
use crate::error::AppError;
use crate::logger;
use crate::tools::{FrameworkUpdater, PackageInstaller};

/// Result of asking for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The dependency moved from `from` to `to` (always `from + 1`)
    Advanced { from: u64, to: u64 },
    /// The dependency was already at or above the target; nothing ran
    AlreadyConverged,
}

/// Performs upgrade steps on behalf of the convergence loop
pub trait StepExecutor {
    /// Bring the repository into a clean state before the first pass
    fn prepare(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Advance `identifier` by one major version towards `target`.
    ///
    /// Must not invoke anything or touch the table when the dependency is
    /// already converged. On error the table is left unchanged.
    fn advance(
        &mut self,
        table: &mut VersionTable,
        identifier: &str,
        target: u64,
    ) -> Result<StepOutcome, AppError>;
}

/// Step executor backed by the external tools
pub struct CommandStepExecutor<'a> {
    settings: &'a Settings,
    updater: FrameworkUpdater<'a>,
    installer: PackageInstaller<'a>,
    gate: RepositoryGate<'a>,
}

impl<'a> CommandStepExecutor<'a> {
    /// Create an executor from its collaborators
    pub fn new(
        settings: &'a Settings,
        updater: FrameworkUpdater<'a>,
        installer: PackageInstaller<'a>,
        gate: RepositoryGate<'a>,
    ) -> Self {
        Self {
            settings,
            updater,
            installer,
            gate,
        }
    }
}

impl StepExecutor for CommandStepExecutor<'_> {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.gate.ensure_branch(&self.settings.branch_name())?;

        logger::debug("Reconciling peer dependencies before the first step");
        self.installer.install_peer_deps()?;
        self.gate
            .commit_if_dirty(&self.settings.migration_message())?;
        Ok(())
    }

    fn advance(
        &mut self,
        table: &mut VersionTable,
        identifier: &str,
        target: u64,
    ) -> Result<StepOutcome, AppError> {
        let Some(from) = table.get(identifier) else {
            return Ok(StepOutcome::AlreadyConverged);
        };
        logger::info(format!(
            "Reading dependency {} -- Current version: {}",
            identifier, from
        ));
        if from >= target {
            return Ok(StepOutcome::AlreadyConverged);
        }

        let to = from + 1;
        logger::debug(format!("Updating {} to {}", identifier, to));
        logger::debug(format!(
            "Running {}",
            self.updater.invocation(identifier, to)
        ));
        self.updater.update(identifier, to)?;
        logger::success(format!("Success updating {} to {}", identifier, to));

        self.installer.install_peer_deps()?;
        self.gate
            .commit_step(&self.settings.step_message(identifier, to));

        table.set(identifier, to);
        Ok(StepOutcome::Advanced { from, to })
    }
}
