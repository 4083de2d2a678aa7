//! Child process execution.
//!
//! The clone runner talks to git only through [`ProcessRunner`], so it can be
//! exercised without a git binary or network access.

mod error;
mod tokio_runner;

pub use error::ProcessError;
pub use tokio_runner::TokioProcessRunner;

use futures::future::BoxFuture;
use std::path::PathBuf;
use std::time::Duration;

/// A command to run as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,

    /// Extra environment variables layered over the inherited environment.
    pub env: Vec<(String, String)>,

    /// Working directory; `None` inherits the current one.
    pub current_dir: Option<PathBuf>,

    /// Kill the child and fail once this elapses.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
            timeout: None,
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Bounds the run time.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,

    /// Standard error, lossily decoded.
    pub stderr: String,

    /// Exit code; `None` if the process was ended by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Returns true if the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs commands as child processes.
///
/// A non-zero exit is not an error at this level; it is reported through
/// [`ProcessOutput::exit_code`]. Dropping the returned future must terminate
/// the child.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` to completion and captures its output.
    fn run(&self, command: CommandSpec) -> BoxFuture<'_, Result<ProcessOutput, ProcessError>>;
}
