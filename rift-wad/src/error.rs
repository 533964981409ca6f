//! Error types for WAD archive reading

use thiserror::Error;

/// Result type for WAD operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload decompression error
    #[error("Decompression error: {0}")]
    Decompress(#[from] rift_decompress::Error),

    /// Buffer shorter than a read requires
    #[error("Truncated data at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A declared count is impossible for the remaining buffer
    #[error("Implausible manifest record count {count}: only {remaining} bytes remain")]
    ImplausibleCount { count: u32, remaining: usize },

    /// No chunk with the requested hash
    #[error("No chunk with hash {0:#018x}")]
    ChunkNotFound(u64),
}
