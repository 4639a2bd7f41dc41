//! Package manager calls

use crate::error::CommandError;
use crate::runner::{CommandRunner, Invocation, OutputMode};

/// Package manager used for installs and the final start command
pub struct PackageInstaller<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    mode: OutputMode,
}

impl<'a> PackageInstaller<'a> {
    /// Create an installer calling `program` (e.g. `npm`)
    pub fn new(runner: &'a dyn CommandRunner, program: impl Into<String>, mode: OutputMode) -> Self {
        Self {
            runner,
            program: program.into(),
            mode,
        }
    }

    /// Install a single package spec, e.g. `primeng@12`
    pub fn install(&self, package_spec: &str) -> Result<(), CommandError> {
        let invocation = Invocation::new(&self.program).args(["install", package_spec]);
        self.runner.run(&invocation, self.mode).map(|_| ())
    }

    /// Reinstall the dependency graph so peer dependencies match again
    pub fn install_peer_deps(&self) -> Result<(), CommandError> {
        let invocation = Invocation::new(&self.program).arg("install");
        self.runner.run(&invocation, self.mode).map(|_| ())
    }

    /// Hand the terminal to the project's start command until it exits
    pub fn start(&self, argv: &[String]) -> Result<(), CommandError> {
        let Some(invocation) = Invocation::from_argv(argv) else {
            return Ok(());
        };
        self.runner.run(&invocation, OutputMode::Inherit).map(|_| ())
    }
}
