//! Git credentials for authenticated clones.

use serde::Deserialize;
use std::fmt;

/// Resolved credentials embedded into the clone URL.
///
/// Both fields are free-form: a password, a personal access token, or a
/// provider-specific username such as `x-access-token`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username or token name.
    pub username: String,

    /// Password or token.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Credentials as they arrive on the wire.
///
/// Either half may be missing; [`CredentialsInput::resolve`] decides whether
/// the pair is usable.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsInput {
    /// Username or token name.
    #[serde(default)]
    pub username: Option<String>,

    /// Password or token.
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsInput {
    /// Returns complete credentials, or `None` if either half is missing.
    ///
    /// Only presence is checked; an empty string is a valid value.
    #[must_use]
    pub fn resolve(&self) -> Option<Credentials> {
        let username = self.username.as_deref()?;
        let password = self.password.as_deref()?;
        Some(Credentials::new(username, password))
    }
}

impl From<Credentials> for CredentialsInput {
    fn from(credentials: Credentials) -> Self {
        Self {
            username: Some(credentials.username),
            password: Some(credentials.password),
        }
    }
}

impl fmt::Debug for CredentialsInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsInput")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
