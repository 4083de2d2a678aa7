//! Discovery settings loading.
//!
//! Settings come from an optional `config.toml` file and may be overridden by
//! environment variables:
//!
//! ```text
//! git-binary = "git"
//! clone-timeout-secs = 60
//! temp-root = "/var/tmp"
//! temp-prefix = "fleet-git-"
//! debug-log-capacity = 100
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{DiscoveryConfig, DEFAULT_CLONE_TIMEOUT_SECS, DEFAULT_DEBUG_LOG_CAPACITY};

use std::path::Path;
use tracing::{debug, info, warn};

const GIT_BINARY_ENV: &str = "FLEET_DISCOVERY_GIT_BINARY";
const CLONE_TIMEOUT_ENV: &str = "FLEET_DISCOVERY_CLONE_TIMEOUT_SECS";

/// Loads discovery settings.
///
/// A missing file yields the defaults. Environment variables take precedence
/// over the file.
///
/// # Arguments
///
/// * `path` - Optional path to a `config.toml` file
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, is not valid TOML, or
/// holds values that fail validation.
pub fn load_config(path: Option<&Path>) -> Result<DiscoveryConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => DiscoveryConfig::default(),
    };

    apply_env_overrides(&mut config);

    let source = path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());
    validate(&config, &source)?;

    debug!(
        git_binary = %config.git_binary,
        clone_timeout_secs = config.clone_timeout_secs,
        temp_root = %config.temp_root().display(),
        "Loaded discovery settings"
    );
    Ok(config)
}

/// Reads and parses a settings file, falling back to defaults if it is absent.
fn read_config_file(path: &Path) -> Result<DiscoveryConfig, ConfigError> {
    if !path.exists() {
        info!(path = %path.display(), "Settings file not found, using defaults");
        return Ok(DiscoveryConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::TomlError {
        path: path.display().to_string(),
        source,
    })
}

/// Applies environment overrides. Unusable values are ignored with a warning.
fn apply_env_overrides(config: &mut DiscoveryConfig) {
    if let Ok(binary) = std::env::var(GIT_BINARY_ENV) {
        if binary.trim().is_empty() {
            warn!("Ignoring empty {GIT_BINARY_ENV}");
        } else {
            config.git_binary = binary;
        }
    }

    if let Ok(value) = std::env::var(CLONE_TIMEOUT_ENV) {
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => config.clone_timeout_secs = secs,
            _ => warn!("Ignoring invalid {CLONE_TIMEOUT_ENV} value '{value}'"),
        }
    }
}

fn validate(config: &DiscoveryConfig, source: &str) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::ValidationError {
        path: source.to_string(),
        message: message.to_string(),
    };

    if config.git_binary.trim().is_empty() {
        return Err(invalid("git-binary must not be empty"));
    }
    if config.clone_timeout_secs == 0 {
        return Err(invalid("clone-timeout-secs must be greater than zero"));
    }
    if config.debug_log_capacity == 0 {
        return Err(invalid("debug-log-capacity must be greater than zero"));
    }
    if config.temp_prefix.contains(['/', '\\']) {
        return Err(invalid("temp-prefix must not contain path separators"));
    }
    Ok(())
}
