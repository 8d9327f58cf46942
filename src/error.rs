//! Error types for thumbflow

use thiserror::Error;

/// Main error type for loader operations
///
/// Queue calls never surface errors (failed fetches only leave elements on
/// their placeholder); this type covers the fallible edges — adapter
/// construction and configuration checks.
#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, ThumbError>;
