//! Error types for sift_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or driving the host
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to read a configuration file
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or has the wrong shape
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configured value is out of range
    #[error("invalid config value `{field}`: {reason}")]
    ConfigValue { field: &'static str, reason: String },

    /// A dropdown rejected its configuration
    #[error("invalid dropdown: {0}")]
    Dropdown(#[from] sift_cn::DropdownError),

    /// No element with this key in the current tree
    #[error("no element with key {0:?}")]
    UnknownElement(String),

    /// A script step could not be carried out
    #[error("script step {index}: {message}")]
    Script { index: usize, message: String },
}

/// Result type for sift_app operations
pub type Result<T> = std::result::Result<T, AppError>;
