//! The `pathHashes` manifest embedded in some archives.
//!
//! One distinguished chunk ([`MANIFEST_HASH`][crate::MANIFEST_HASH])
//! carries a table mapping chunk hashes back to the human-readable
//! paths they were built from. The table sits at an unspecified
//! offset inside the chunk, so parsing starts with a marker scan.
//!
//! Layout after the marker: padding up to 4-byte alignment, 4 skipped
//! bytes, `count: u32`, then `count` records of
//! `{ hash: u64, len: u32, utf8[len] }` with no inter-record padding.
//! All integers little-endian.

use std::collections::HashMap;

use tracing::debug;

use crate::{Error, Result};

/// ASCII marker preceding the path table.
pub const PATH_MARKER: &[u8] = b"pathHashes\0";

/// Hash → path table recovered from a manifest chunk.
#[derive(Debug, Default, Clone)]
pub struct PathManifest {
    paths: HashMap<u64, String>,
}

impl PathManifest {
    /// Parses a decompressed manifest chunk.
    ///
    /// A chunk without the marker yields an empty table; that is how
    /// archives without a manifest look. Truncation after the marker
    /// is an error, since the table is then known to be present but
    /// unreadable.
    pub fn parse(chunk: &[u8]) -> Result<Self> {
        let Some(marker) = find_marker(chunk) else {
            debug!("no pathHashes marker in manifest chunk");
            return Ok(Self::default());
        };

        let mut pos = marker + PATH_MARKER.len();
        pos = (pos + 3) & !3; // 4-byte align
        pos += 4; // flags/padding, contents undocumented

        let count = read_u32(chunk, &mut pos)?;
        // Each record is at least 12 bytes (hash + length word); a
        // count beyond that can only come from corruption and must be
        // rejected before it sizes the table.
        let remaining = chunk.len().saturating_sub(pos);
        if u64::from(count) * 12 > remaining as u64 {
            return Err(Error::ImplausibleCount { count, remaining });
        }
        let mut paths = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let hash = read_u64(chunk, &mut pos)?;
            let len = read_u32(chunk, &mut pos)? as usize;
            let bytes = take(chunk, &mut pos, len)?;
            paths.insert(hash, String::from_utf8_lossy(bytes).into_owned());
        }

        debug!("manifest: {} paths", paths.len());
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path for a chunk hash, if the manifest knows it.
    pub fn resolve(&self, hash: u64) -> Option<&str> {
        self.paths.get(&hash).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.paths.iter().map(|(h, p)| (*h, p.as_str()))
    }
}

fn find_marker(chunk: &[u8]) -> Option<usize> {
    chunk
        .windows(PATH_MARKER.len())
        .position(|w| w == PATH_MARKER)
}

fn take<'a>(chunk: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8]> {
    let end = pos.checked_add(n).filter(|&e| e <= chunk.len()).ok_or(
        Error::Truncated {
            offset: *pos,
            needed: n,
            available: chunk.len().saturating_sub(*pos),
        },
    )?;
    let out = &chunk[*pos..end];
    *pos = end;
    Ok(out)
}

fn read_u32(chunk: &[u8], pos: &mut usize) -> Result<u32> {
    let b = take(chunk, pos, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_u64(chunk: &[u8], pos: &mut usize) -> Result<u64> {
    let b = take(chunk, pos, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Builds a manifest chunk with `lead` junk bytes before the
    /// marker.
    fn chunk(lead: usize, records: &[(u64, &str)]) -> Vec<u8> {
        let mut buf = vec![0xAAu8; lead];
        buf.extend_from_slice(PATH_MARKER);
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
        buf.extend_from_slice(&[0u8; 4]); // skipped flags
        buf.extend_from_slice(&(records.len() as u32).to_le_bytes());
        for (hash, path) in records {
            buf.extend_from_slice(&hash.to_le_bytes());
            buf.extend_from_slice(&(path.len() as u32).to_le_bytes());
            buf.extend_from_slice(path.as_bytes());
        }
        buf
    }

    #[test]
    fn parses_records() {
        let c = chunk(
            7,
            &[
                (0xDEAD_BEEF, "data/spells/q.bin"),
                (0x1234, "assets/icon.dds"),
            ],
        );
        let m = PathManifest::parse(&c).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.resolve(0xDEAD_BEEF), Some("data/spells/q.bin"));
        assert_eq!(m.resolve(0x1234), Some("assets/icon.dds"));
        assert_eq!(m.resolve(0x5678), None);
    }

    #[test]
    fn alignment_with_marker_at_zero() {
        // Marker at offset 0: end of marker is 11, aligned to 12.
        let c = chunk(0, &[(1, "a")]);
        let m = PathManifest::parse(&c).unwrap();
        assert_eq!(m.resolve(1), Some("a"));
    }

    #[test]
    fn missing_marker_is_empty_not_error() {
        let m = PathManifest::parse(b"no table in here").unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn implausible_count_is_rejected_before_allocating() {
        let mut c = chunk(0, &[]);
        // Overwrite the count word (last 4 bytes of an empty chunk).
        let at = c.len() - 4;
        c[at..].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = PathManifest::parse(&c).unwrap_err();
        assert!(matches!(
            err,
            Error::ImplausibleCount {
                count: u32::MAX,
                ..
            }
        ));
    }

    #[test]
    fn truncated_record_is_error() {
        let mut c = chunk(0, &[(1, "some/long/path.bin")]);
        c.truncate(c.len() - 5);
        let err = PathManifest::parse(&c).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }
}
