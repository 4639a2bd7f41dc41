//! Working branch and commit handling around upgrade steps
//!
//! Every step starts from, and leaves behind, a committed work tree on the
//! working branch. Status checks and the commits they trigger always run
//! silenced, whatever the global verbosity.

use crate::error::CommandError;
use crate::logger;
use crate::runner::OutputMode;
use crate::tools::Git;

/// What `ensure_branch` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchAction {
    /// The branch already existed and was checked out
    CheckedOut,
    /// The branch was created from HEAD
    Created,
}

/// Keeps the repository on the working branch with a clean tree
pub struct RepositoryGate<'a> {
    git: Git<'a>,
}

impl<'a> RepositoryGate<'a> {
    /// Create a gate over a git client
    pub fn new(git: Git<'a>) -> Self {
        Self { git }
    }

    /// Check out `name`, creating it first if it does not exist
    pub fn ensure_branch(&self, name: &str) -> Result<BranchAction, CommandError> {
        if self.git.branch_exists(name) {
            logger::info(format!("Branch {} already exists, checking it out", name));
            self.git.checkout(name)?;
            Ok(BranchAction::CheckedOut)
        } else {
            logger::info(format!("Creating {} branch", name));
            self.git.create_branch(name)?;
            Ok(BranchAction::Created)
        }
    }

    /// Commit every pending change, if there is any.
    ///
    /// Returns whether a commit was made. A clean tree issues no add/commit.
    pub fn commit_if_dirty(&self, message: &str) -> Result<bool, CommandError> {
        logger::info("Checking for uncommitted changes...");
        let status = self.git.status()?;

        if status.trim().is_empty() {
            logger::success("Work tree is clean, moving forward");
            return Ok(false);
        }

        logger::debug("Work tree has changes, committing them");
        self.git.add_all(OutputMode::Silent)?;
        self.git.commit(message, OutputMode::Silent)?;
        logger::success("Changes committed.");
        Ok(true)
    }

    /// Stage and commit after an upgrade step.
    ///
    /// Failures (usually "nothing to commit") are logged and swallowed.
    pub fn commit_step(&self, message: &str) -> bool {
        logger::debug("Committing changes...");
        let mode = self.git.mode();
        let result = self
            .git
            .add_all(mode)
            .and_then(|_| self.git.commit(message, mode));

        match result {
            Ok(()) => {
                logger::success("Changes committed successfully.");
                true
            }
            Err(e) => {
                logger::debug(format!("Nothing committed ({})", e));
                false
            }
        }
    }
}
