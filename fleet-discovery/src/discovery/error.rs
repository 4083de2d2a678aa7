//! Discovery error types.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during path discovery.
///
/// Messages never contain raw credentials; any URL in them is sanitized.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The request is malformed (insecure URL, incomplete credentials, bad branch).
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// The remote rejected the supplied credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The repository or the requested branch does not exist.
    #[error("Repository or branch not found: {message}")]
    NotFound { message: String },

    /// The clone did not finish within the allotted time.
    #[error("git clone timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Unexpected child-process or filesystem failure.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DiscoveryError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status the routing layer answers with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// Builds the serializable error payload.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        }
    }
}

/// Failure class of a [`DiscoveryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    Authentication,
    NotFound,
    Timeout,
    Internal,
}

impl ErrorKind {
    /// Maps the class to a status code: 400, 401, 404, else 500.
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Authentication => 401,
            Self::NotFound => 404,
            Self::Timeout | Self::Internal => 500,
        }
    }
}

/// Error payload returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable, sanitized message.
    pub error: String,

    /// Failure class.
    pub kind: ErrorKind,
}
