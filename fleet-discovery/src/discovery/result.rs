//! Discovery output types.

use serde::Serialize;

/// One Fleet bundle found in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInfo {
    /// Directory of the bundle, relative to the repository root, `/`-separated.
    pub path: String,

    /// Bundles this one depends on. Omitted when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
}

impl PathInfo {
    /// Creates a path entry, dropping an empty dependency list.
    pub fn new(path: impl Into<String>, depends_on: Vec<String>) -> Self {
        Self {
            path: path.into(),
            depends_on: (!depends_on.is_empty()).then_some(depends_on),
        }
    }
}

/// Outcome of a successful discovery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    /// Bundles, sorted by path.
    pub paths: Vec<PathInfo>,

    /// Branch that was cloned.
    pub branch: String,

    /// Clone duration in milliseconds.
    pub clone_time_ms: u64,

    /// Scan and extraction duration in milliseconds.
    pub scan_time_ms: u64,
}

/// Payload of the debug-logs endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    /// Whether the engine accepts requests.
    pub ready: bool,

    /// Retained log lines, oldest first.
    pub logs: Vec<String>,
}
