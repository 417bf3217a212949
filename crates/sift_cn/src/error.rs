//! Error types for sift_cn

use thiserror::Error;

/// Invalid component configuration, reported by the builders
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DropdownError {
    /// Pagination needs at least one option per step
    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),

    #[error("chip padding must not be negative, got {0}")]
    InvalidPadding(f32),

    /// Keys prefix every element key, separated by '/'
    #[error("invalid element key {0:?}: must be non-empty and contain no '/'")]
    InvalidKey(String),
}

/// Result type for sift_cn builders
pub type Result<T> = std::result::Result<T, DropdownError>;
