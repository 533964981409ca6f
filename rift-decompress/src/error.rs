//! Error types for payload decompression

use thiserror::Error;

/// Result type for decompression operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),
}
