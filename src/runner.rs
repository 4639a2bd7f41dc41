//! External command execution
//!
//! This module provides:
//! - A description of a single external invocation
//! - The `CommandRunner` trait every tool call goes through
//! - A system runner that spawns real processes
//! - A dry-run runner that only logs what would be executed

use crate::error::CommandError;
use crate::logger;
use crate::progress::Progress;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments passed verbatim
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation without arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build an invocation from an argv list; `None` if it is empty
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        Some(Self::new(program.as_ref()).args(rest.iter().map(|a| a.as_ref())))
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a command's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Output is captured and not shown
    #[default]
    Silent,
    /// The command inherits the terminal's stdin, stdout and stderr
    Inherit,
}

impl OutputMode {
    /// Output mode matching the `--verbose` flag
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            OutputMode::Inherit
        } else {
            OutputMode::Silent
        }
    }
}

/// Output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output (empty in `Inherit` mode)
    pub stdout: String,
    /// Captured standard error (empty in `Inherit` mode)
    pub stderr: String,
}

impl CommandOutput {
    /// Output with the given stdout and nothing on stderr
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Trait for running external commands.
///
/// Calls block until the process exits. A non-zero exit is an error.
pub trait CommandRunner {
    /// Run the invocation to completion
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput, CommandError>;
}

/// Runner that executes real processes in the project directory
#[derive(Debug)]
pub struct SystemRunner {
    /// Directory every command runs in
    working_dir: PathBuf,
    /// Whether to show a spinner while silenced commands run
    show_progress: bool,
}

impl SystemRunner {
    /// Create a runner rooted at `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            show_progress: true,
        }
    }

    /// Enable or disable the spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Directory commands run in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&self.working_dir);
        command
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput, CommandError> {
        let rendered = invocation.to_string();

        match mode {
            OutputMode::Inherit => {
                let status = self
                    .command(invocation)
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|e| CommandError::spawn_failed(&rendered, e))?;

                if status.success() {
                    Ok(CommandOutput::default())
                } else {
                    Err(CommandError::failed(rendered, status.code(), ""))
                }
            }
            OutputMode::Silent => {
                let mut progress = Progress::new(self.show_progress);
                progress.spinner(&rendered);
                let output = self
                    .command(invocation)
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|e| CommandError::spawn_failed(&rendered, e));
                progress.finish_and_clear();
                let output = output?;

                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    Ok(CommandOutput { stdout, stderr })
                } else {
                    Err(CommandError::failed(rendered, output.status.code(), stderr))
                }
            }
        }
    }
}

/// Runner that logs invocations without executing them.
///
/// Every command succeeds with empty output, so status checks see a clean tree.
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl DryRunRunner {
    /// Create a new dry-run runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation, _mode: OutputMode) -> Result<CommandOutput, CommandError> {
        logger::debug(format!("(dry-run) {}", invocation));
        Ok(CommandOutput::default())
    }
}
