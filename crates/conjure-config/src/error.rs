//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// The project configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project configuration is not valid YAML for this schema.
    #[error("failed to parse conjure-plugin configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration declares a schema version other than 1.
    #[error("unsupported configuration version {version}; only version 1 is supported")]
    UnsupportedVersion { version: String },

    /// A project's IR locator is empty.
    #[error("failed to convert configuration for {project} to provider: locator cannot be empty")]
    EmptyLocator { project: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

