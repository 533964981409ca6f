//! Error types for PROP decoding

use thiserror::Error;

/// Result type for PROP operations
pub type Result<T> = std::result::Result<T, Error>;

/// PROP decode errors.
///
/// Everything except [`Error::Io`] describes a defect in the input
/// buffer. The buffer is fixed input, so none of these are worth
/// retrying; each carries enough position context to diagnose the
/// file.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (hash database loading only; decoding never does IO)
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

    /// File does not start with a known magic
    #[error("Bad magic {found:?}, expected \"PROP\" (optionally wrapped in \"PTCH\")")]
    BadMagic { found: [u8; 4] },

    /// Type tag byte with no dispatch entry. Unknown tags cannot be
    /// skipped: their encoded width is unknown.
    #[error("Unhandled type tag {tag:#04x} at offset {offset}")]
    UnknownTypeTag { tag: u8, offset: usize },

    /// A container's declared byte span does not match the bytes its
    /// contents actually consumed
    #[error(
        "Size mismatch in {container}: declared span ends at {expected_end}, decoded to {actual_end}"
    )]
    SizeMismatch {
        container: &'static str,
        expected_end: usize,
        actual_end: usize,
    },

    /// Neither candidate word after the magic is a plausible version
    #[error("Cannot locate version field: neither {first} nor {second} is <= {max}",
        max = crate::parser::MAX_VERSION)]
    VersionUnresolved { first: u32, second: u32 },

    /// A declared count is impossible for the remaining buffer
    #[error("Implausible {what} count {count}: only {remaining} bytes remain")]
    ImplausibleCount {
        what: &'static str,
        count: u32,
        remaining: usize,
    },

    /// Containers nested deeper than the decoder follows
    #[error("Container nesting exceeds {max} levels at offset {offset}",
        max = crate::parser::MAX_DEPTH)]
    DepthExceeded { offset: usize },
}
