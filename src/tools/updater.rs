//! Framework update CLI calls

use crate::error::CommandError;
use crate::runner::{CommandRunner, Invocation, OutputMode};

/// Framework updater, e.g. `ng update --force`
pub struct FrameworkUpdater<'a> {
    runner: &'a dyn CommandRunner,
    argv: Vec<String>,
    mode: OutputMode,
}

impl<'a> FrameworkUpdater<'a> {
    /// Create an updater; `<identifier>@<version>` is appended to `argv`
    pub fn new(runner: &'a dyn CommandRunner, argv: Vec<String>, mode: OutputMode) -> Self {
        Self { runner, argv, mode }
    }

    /// The invocation that moves `identifier` to `version`
    pub fn invocation(&self, identifier: &str, version: u64) -> Invocation {
        let target = format!("{}@{}", identifier, version);
        match Invocation::from_argv(self.argv.as_slice()) {
            Some(invocation) => invocation.arg(target),
            None => Invocation::new(target),
        }
    }

    /// Update `identifier` to major `version`
    pub fn update(&self, identifier: &str, version: u64) -> Result<(), CommandError> {
        self.runner
            .run(&self.invocation(identifier, version), self.mode)
            .map(|_| ())
    }
}
