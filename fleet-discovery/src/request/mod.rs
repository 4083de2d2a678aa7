//! Discovery request model and validation.

mod credentials;

pub use credentials::{Credentials, CredentialsInput};

use crate::discovery::DiscoveryError;
use bstr::ByteSlice;
use serde::Deserialize;
use url::Url;

/// A request to discover bundle paths in one repository.
///
/// Deserializes from the routing layer's JSON body:
///
/// ```json
/// { "repo": "https://github.com/org/repo", "branch": "main",
///   "credentials": { "username": "bot", "password": "token" } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    /// Repository URL. Must use `https://`.
    pub repo: String,

    /// Branch to clone. `None` selects the remote's default branch.
    #[serde(default)]
    pub branch: Option<String>,

    /// Already-resolved credentials for private repositories.
    #[serde(default)]
    pub credentials: Option<CredentialsInput>,

    /// Name of the secret the credentials were resolved from, if any.
    ///
    /// Secret lookup happens before the request reaches the engine; the
    /// name is only recorded for diagnostics.
    #[serde(default)]
    pub secret_name: Option<String>,
}

impl DiscoveryRequest {
    /// Creates a request for the default branch of `repo`.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Default::default()
        }
    }

    /// Selects a branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Attaches credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Records the secret the credentials came from.
    #[must_use]
    pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = Some(secret_name.into());
        self
    }

    /// Validates the request shape.
    ///
    /// Runs before any workspace or child process exists.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Validation`] if the URL does not use HTTPS,
    /// credentials are incomplete, or the branch is not a valid ref name.
    pub fn validate(&self) -> Result<ValidatedRequest, DiscoveryError> {
        validate_repo_url(&self.repo)?;

        let branch = self
            .branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(validate_branch)
            .transpose()?;

        let credentials = match &self.credentials {
            Some(input) => Some(input.resolve().ok_or_else(|| {
                DiscoveryError::validation("credentials must include both username and password")
            })?),
            None => None,
        };

        Ok(ValidatedRequest {
            repo: self.repo.clone(),
            branch,
            credentials,
            secret_name: self.secret_name.clone().filter(|s| !s.is_empty()),
        })
    }
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// HTTPS repository URL, as supplied.
    pub repo: String,

    /// Explicitly requested branch.
    pub branch: Option<String>,

    /// Complete credentials, if any were supplied.
    pub credentials: Option<Credentials>,

    /// Secret reference recorded for diagnostics.
    pub secret_name: Option<String>,
}

fn validate_repo_url(repo: &str) -> Result<(), DiscoveryError> {
    if repo.trim().is_empty() {
        return Err(DiscoveryError::validation("repo is required"));
    }

    let url = Url::parse(repo).map_err(|e| {
        DiscoveryError::validation(format!("repo is not a valid URL: {e}"))
    })?;

    if url.scheme() != "https" {
        return Err(DiscoveryError::validation(
            "Only HTTPS repository URLs are supported",
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(DiscoveryError::validation("repo URL must include a host"));
    }
    Ok(())
}

fn validate_branch(branch: &str) -> Result<String, DiscoveryError> {
    // A leading dash would be read as an option by git.
    if branch.starts_with('-') {
        return Err(DiscoveryError::validation(format!(
            "branch '{branch}' must not start with '-'"
        )));
    }

    gix_validate::reference::name_partial(branch.as_bytes().as_bstr()).map_err(|e| {
        DiscoveryError::validation(format!("branch '{branch}' is not a valid ref name: {e}"))
    })?;

    Ok(branch.to_string())
}
