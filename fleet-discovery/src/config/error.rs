//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading discovery settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting holds a value the engine cannot run with.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },
}
