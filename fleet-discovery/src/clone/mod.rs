//! Shallow clones through the git command line.
//!
//! Clones are depth 1 and single-branch. Without an explicit branch, git
//! follows the remote's advertised HEAD, and the branch it checked out is
//! read back from the clone.

mod classify;

use crate::debug_log::DebugLog;
use crate::discovery::DiscoveryError;
use crate::process::{CommandSpec, ProcessError, ProcessOutput, ProcessRunner};
use crate::remote_url::{sanitize_url, scrub_secrets};
use crate::request::Credentials;
use classify::{classify, CloneFailure};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of a successful clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedWorkspace {
    /// Directory holding the working tree.
    pub directory_path: PathBuf,

    /// Branch that was checked out.
    pub branch_used: String,

    /// Wall time of the clone, in milliseconds.
    pub elapsed_millis: u64,
}

/// Inputs of one clone.
#[derive(Debug, Clone, Copy)]
pub struct CloneRequest<'a> {
    /// Clone URL, possibly carrying credentials.
    pub url: &'a str,

    /// Branch to clone; `None` uses the remote default.
    pub branch: Option<&'a str>,

    /// Empty directory to clone into.
    pub target: &'a Path,

    /// Credentials embedded in `url`, scrubbed from any git output.
    pub credentials: Option<&'a Credentials>,
}

/// Runs shallow clones with a bounded run time.
#[derive(Clone)]
pub struct CloneRunner {
    runner: Arc<dyn ProcessRunner>,
    git_binary: String,
    timeout: Duration,
}

impl CloneRunner {
    /// Creates a clone runner.
    pub fn new(runner: Arc<dyn ProcessRunner>, git_binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            git_binary: git_binary.into(),
            timeout,
        }
    }

    /// Returns the clone timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Shallow-clones `request.url` into `request.target`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Authentication`] if the remote rejected access
    /// - [`DiscoveryError::NotFound`] if the repository or branch is missing
    /// - [`DiscoveryError::Timeout`] if the clone exceeded the timeout
    /// - [`DiscoveryError::Internal`] for any other failure
    pub async fn shallow_clone(
        &self,
        request: CloneRequest<'_>,
        log: &DebugLog,
    ) -> Result<ClonedWorkspace, DiscoveryError> {
        let started = Instant::now();
        let safe_url = sanitize_url(request.url);

        let mut args = vec!["clone".to_string(), "--depth".into(), "1".into()];
        if let Some(branch) = request.branch {
            args.extend(["--branch".to_string(), branch.to_string()]);
        }
        args.push("--single-branch".into());

        log.record(format!(
            "Executing: {} {} {safe_url} {}",
            self.git_binary,
            args.join(" "),
            request.target.display()
        ));

        args.extend([
            "--".to_string(),
            request.url.to_string(),
            request.target.display().to_string(),
        ]);
        let command = self.git_command().args(args);

        let output = self.execute(command).await?;
        if !output.success() {
            let error = clone_failure(&output, &request, &safe_url);
            log.record(format!("Clone failed: {error}"));
            return Err(error);
        }

        let branch_used = match request.branch {
            Some(branch) => branch.to_string(),
            None => self.resolve_checked_out_branch(request.target).await?,
        };

        let elapsed_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log.record(format!(
            "Successfully cloned {safe_url} (branch: {branch_used}) in {elapsed_millis}ms"
        ));

        Ok(ClonedWorkspace {
            directory_path: request.target.to_path_buf(),
            branch_used,
            elapsed_millis,
        })
    }

    /// Reads the branch git checked out from the remote's HEAD.
    ///
    /// `symbolic-ref` also answers for an empty repository, where HEAD points
    /// at an unborn branch.
    async fn resolve_checked_out_branch(&self, repo: &Path) -> Result<String, DiscoveryError> {
        let command = self
            .git_command()
            .args(["symbolic-ref", "--short", "HEAD"])
            .current_dir(repo);
        let output = self.execute(command).await?;

        let branch = output.stdout.trim();
        if !output.success() || branch.is_empty() {
            warn!(stderr = %output.stderr.trim(), "Could not resolve checked-out branch");
            return Err(DiscoveryError::internal(format!(
                "could not determine the default branch: {}",
                output.stderr.trim()
            )));
        }

        debug!(branch, "Resolved remote default branch");
        Ok(branch.to_string())
    }

    fn git_command(&self) -> CommandSpec {
        CommandSpec::new(&self.git_binary)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_ASKPASS", "")
            .env("SSH_ASKPASS", "")
            .timeout(self.timeout)
    }

    async fn execute(&self, command: CommandSpec) -> Result<ProcessOutput, DiscoveryError> {
        self.runner.run(command).await.map_err(|e| match e {
            ProcessError::Timeout { .. } => DiscoveryError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            },
            other => DiscoveryError::internal(other.to_string()),
        })
    }
}

/// Turns a failed clone into a classified, credential-free error.
fn clone_failure(output: &ProcessOutput, request: &CloneRequest<'_>, safe_url: &str) -> DiscoveryError {
    let stderr = scrub_secrets(output.stderr.trim(), request.credentials);
    let exit = output
        .exit_code
        .map_or_else(|| "signal".to_string(), |code| format!("exit code {code}"));

    match classify(&stderr) {
        CloneFailure::BranchNotFound => DiscoveryError::NotFound {
            message: format!(
                "branch '{}' not found in {safe_url}: {stderr}",
                request.branch.unwrap_or("HEAD")
            ),
        },
        CloneFailure::RepositoryNotFound => DiscoveryError::NotFound {
            message: format!("repository {safe_url} not found: {stderr}"),
        },
        CloneFailure::Authentication => DiscoveryError::Authentication {
            message: format!("access to {safe_url} was denied: {stderr}"),
        },
        CloneFailure::Other => DiscoveryError::internal(format!(
            "git clone of {safe_url} failed ({exit}): {stderr}"
        )),
    }
}
