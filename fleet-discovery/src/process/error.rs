//! Process execution error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running a child process.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started.
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child or reading its output failed.
    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child ran past its deadline and was killed.
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}
