//! [`ProcessRunner`] backed by [`tokio::process::Command`].

use super::{CommandSpec, ProcessError, ProcessOutput, ProcessRunner};
use futures::future::{BoxFuture, FutureExt};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs commands on the Tokio process runtime.
///
/// Children are spawned with stdin closed and `kill_on_drop` set, so a
/// timeout or a dropped future terminates them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn run(&self, command: CommandSpec) -> BoxFuture<'_, Result<ProcessOutput, ProcessError>> {
        run_command(command).boxed()
    }
}

async fn run_command(spec: CommandSpec) -> Result<ProcessOutput, ProcessError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &spec.current_dir {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: spec.program.clone(),
        source,
    })?;
    debug!(program = %spec.program, pid = child.id(), "Spawned child process");

    // Dropping `wait_with_output` on timeout drops the child, which kills it.
    let output = match spec.timeout {
        Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ProcessError::Timeout {
                program: spec.program.clone(),
                timeout,
            })?,
        None => child.wait_with_output().await,
    }
    .map_err(|source| ProcessError::Wait {
        program: spec.program.clone(),
        source,
    })?;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let output = TokioProcessRunner::new()
            .run(CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]))
            .await
            .unwrap();

        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[tokio::test]
    async fn passes_env_and_working_directory() {
        let dir = TempDir::new().unwrap();
        let output = TokioProcessRunner::new()
            .run(
                CommandSpec::new("sh")
                    .args(["-c", "printf '%s' \"$PROBE\"; pwd"])
                    .env("PROBE", "value")
                    .current_dir(dir.path()),
            )
            .await
            .unwrap();

        assert!(output.success());
        assert!(output.stdout.starts_with("value"));
        let reported = std::fs::canonicalize(output.stdout["value".len()..].trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let error = TokioProcessRunner::new()
            .run(CommandSpec::new("definitely-not-a-real-binary-4821"))
            .await
            .unwrap_err();
        assert!(matches!(error, ProcessError::Spawn { .. }));
    }

    #[tokio::test]
    async fn timeout_kills_child() {
        let started = Instant::now();
        let error = TokioProcessRunner::new()
            .run(
                CommandSpec::new("sleep")
                    .args(["30"])
                    .timeout(Duration::from_millis(200)),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ProcessError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
