//! Payload decompression for WAD archive chunks.
//!
//! Chunks inside a WAD archive are individually compressed as zstd
//! frames, but a chunk may also be stored raw. The only reliable
//! signal is the frame magic at the start of the payload, so callers
//! sniff first and pass the buffer through unchanged when the magic
//! is absent.
//!
//! Decompression itself is a capability: the archive and value-tree
//! decoders take a [`Decompressor`] rather than calling zstd
//! directly, so they stay testable without compressed fixtures.

mod error;

use std::borrow::Cow;

use tracing::trace;

pub use error::{Error, Result};

/// zstd frame magic bytes
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Whether `data` starts with a zstd frame.
pub fn is_compressed(data: &[u8]) -> bool {
    data.starts_with(&ZSTD_MAGIC)
}

/// Decompression capability for chunk payloads.
pub trait Decompressor {
    /// Decompress a complete payload into a new buffer.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// [`Decompressor`] backed by the zstd reference implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZstdDecompressor;

impl Decompressor for ZstdDecompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let out = zstd::stream::decode_all(data)
            .map_err(|e| Error::DecompressionFailed(format!("zstd: {e}")))?;
        trace!("zstd: {} bytes -> {} bytes", data.len(), out.len());
        Ok(out)
    }
}

/// Decompress `data` if it carries the zstd frame magic, otherwise
/// pass it through unchanged.
pub fn maybe_decompress<'a>(
    data: &'a [u8],
    decompressor: &dyn Decompressor,
) -> Result<Cow<'a, [u8]>> {
    if is_compressed(data) {
        Ok(Cow::Owned(decompressor.decompress(data)?))
    } else {
        Ok(Cow::Borrowed(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sniff_magic() {
        assert!(is_compressed(&[0x28, 0xB5, 0x2F, 0xFD, 0x00]));
        assert!(!is_compressed(b"PROP"));
        assert!(!is_compressed(&[0x28, 0xB5]));
        assert!(!is_compressed(&[]));
    }

    #[test]
    fn passthrough_uncompressed() {
        let data = b"PROP\x03\x00\x00\x00";
        let out = maybe_decompress(data, &ZstdDecompressor).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, data);
    }

    #[test]
    fn roundtrip_zstd_frame() {
        let plain = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let frame = zstd::stream::encode_all(&plain[..], 0).unwrap();
        assert!(is_compressed(&frame));

        let out = maybe_decompress(&frame, &ZstdDecompressor).unwrap();
        assert_eq!(&*out, &plain[..]);
    }

    #[test]
    fn corrupt_frame_is_an_error() {
        // Magic followed by garbage instead of a frame header.
        let bogus = [0x28, 0xB5, 0x2F, 0xFD, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = maybe_decompress(&bogus, &ZstdDecompressor).unwrap_err();
        assert!(matches!(err, Error::DecompressionFailed(_)));
    }
}
