//! Git calls

use crate::error::CommandError;
use crate::runner::{CommandRunner, Invocation, OutputMode};

/// Version-control client
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    mode: OutputMode,
}

impl<'a> Git<'a> {
    /// Create a git client; `mode` applies to calls without an explicit mode
    pub fn new(runner: &'a dyn CommandRunner, mode: OutputMode) -> Self {
        Self { runner, mode }
    }

    fn git(&self, args: &[&str], mode: OutputMode) -> Result<String, CommandError> {
        let invocation = Invocation::new("git").args(args.iter().copied());
        self.runner.run(&invocation, mode).map(|out| out.stdout)
    }

    /// Returns true if a local branch called `name` exists
    pub fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{}", name);
        self.git(
            &["rev-parse", "--verify", "--quiet", reference.as_str()],
            OutputMode::Silent,
        )
        .is_ok()
    }

    /// Check out an existing branch
    pub fn checkout(&self, name: &str) -> Result<(), CommandError> {
        self.git(&["checkout", name], self.mode).map(|_| ())
    }

    /// Create a branch from HEAD and check it out
    pub fn create_branch(&self, name: &str) -> Result<(), CommandError> {
        self.git(&["checkout", "-b", name], self.mode).map(|_| ())
    }

    /// Porcelain status of the work tree; empty when clean
    pub fn status(&self) -> Result<String, CommandError> {
        self.git(&["status", "--porcelain"], OutputMode::Silent)
    }

    /// Stage every change in the work tree
    pub fn add_all(&self, mode: OutputMode) -> Result<(), CommandError> {
        self.git(&["add", "."], mode).map(|_| ())
    }

    /// Commit the staged changes
    pub fn commit(&self, message: &str, mode: OutputMode) -> Result<(), CommandError> {
        self.git(&["commit", "-m", message], mode).map(|_| ())
    }

    /// Default output mode for this client
    pub fn mode(&self) -> OutputMode {
        self.mode
    }
}
