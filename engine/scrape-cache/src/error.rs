//! Error types for the cache layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while loading or persisting a cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bincode serialization errors
    #[error("Bincode serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Cache file exists but could not be decoded
    #[error("Cache file corrupted at {path:?}: {reason}")]
    Corruption { path: PathBuf, reason: String },
}

impl CacheError {
    /// Create a new corruption error
    pub fn corruption(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corruption { path: path.into(), reason: reason.into() }
    }
}
