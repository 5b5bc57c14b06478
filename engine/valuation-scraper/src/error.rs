//! Error types for the scraper

use scrape_cache::CacheError;
use thiserror::Error;

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that can occur while scraping
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Request could not be completed after all retries
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Server answered with a non-success status after all retries
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Page content was found but could not be understood
    #[error("Failed to parse {context}: {reason}")]
    Parse { context: String, reason: String },

    /// Cache could not be read or written
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// CSV output errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Create a new transport error
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport { url: url.into(), reason: reason.into() }
    }

    /// Create a new parse error
    pub fn parse(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse { context: context.into(), reason: reason.into() }
    }

    /// Whether the error came from the network rather than the content
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}
