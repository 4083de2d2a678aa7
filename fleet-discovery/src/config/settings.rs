//! Discovery settings deserialization.

use serde::Deserialize;
use std::path::PathBuf;

/// Parsed settings from a discovery `config.toml` file.
///
/// Every key is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Git executable used for cloning.
    pub git_binary: String,

    /// Upper bound for a single clone, in seconds.
    pub clone_timeout_secs: u64,

    /// Directory under which clone workspaces are created.
    ///
    /// `None` means the platform temp directory.
    pub temp_root: Option<PathBuf>,

    /// Name prefix for clone workspaces.
    pub temp_prefix: String,

    /// Number of lines retained by the diagnostic log.
    pub debug_log_capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            temp_root: None,
            temp_prefix: default_temp_prefix(),
            debug_log_capacity: DEFAULT_DEBUG_LOG_CAPACITY,
        }
    }
}

impl DiscoveryConfig {
    /// Returns the directory workspaces are created in.
    #[must_use]
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Sets a custom workspace root.
    #[must_use]
    pub fn with_temp_root(mut self, temp_root: PathBuf) -> Self {
        self.temp_root = Some(temp_root);
        self
    }

    /// Sets a custom clone timeout.
    #[must_use]
    pub fn with_clone_timeout_secs(mut self, clone_timeout_secs: u64) -> Self {
        self.clone_timeout_secs = clone_timeout_secs;
        self
    }
}

/// Default clone timeout (60 seconds).
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 60;

/// Default diagnostic log capacity.
pub const DEFAULT_DEBUG_LOG_CAPACITY: usize = 100;

pub(crate) fn default_git_binary() -> String {
    "git".to_string()
}

pub(crate) fn default_temp_prefix() -> String {
    "fleet-git-".to_string()
}
