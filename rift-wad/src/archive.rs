//! Chunk-table reader for WAD archives.
//!
//! A WAD archive is a flat container: a fixed-offset table of
//! `(hash, offset, size)` entries, followed by the chunk payloads the
//! entries point into. Patch releases append entries for hashes that
//! already exist earlier in the table; the later entry is the one the
//! game loads, so the scan here keeps the last occurrence of each
//! hash.
//!
//! Table corruption is never fatal at this layer. A bad entry costs
//! exactly that chunk; everything else in the archive is still
//! recovered, and the number of entries dropped this way is reported
//! via [`ArchiveIndex::skipped_entries`].

use std::{borrow::Cow, collections::HashMap, io::Cursor};

use byteorder::{LittleEndian, ReadBytesExt};
use rift_decompress::{Decompressor, maybe_decompress};
use tracing::{debug, warn};

use crate::{Error, Result, manifest::PathManifest};

/// Byte offset of the first chunk-table entry.
pub const TABLE_OFFSET: usize = 0x120;

/// Stride of one chunk-table entry: `u64 hash | u32 offset | u32 size`.
pub const ENTRY_SIZE: usize = 16;

/// Scan ceiling on table entries. A bound on the scan, not a format
/// limit; real archives stay far below it.
pub const MAX_ENTRIES: usize = 50_000;

/// Hash of the manifest chunk carrying the `pathHashes` table.
pub const MANIFEST_HASH: u64 = 0x0000000300000180;

/// One raw chunk-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTableEntry {
    pub hash: u64,
    pub offset: u32,
    pub size: u32,
}

impl ChunkTableEntry {
    /// Reads one 16-byte entry.
    fn parse<R: std::io::Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u64::<LittleEndian>()?,
            offset: r.read_u32::<LittleEndian>()?,
            size: r.read_u32::<LittleEndian>()?,
        })
    }

    /// An all-zero entry terminates the table.
    pub fn is_terminator(&self) -> bool {
        self.hash == 0 && self.offset == 0 && self.size == 0
    }

    /// Whether the payload range lies inside an archive of
    /// `archive_len` bytes.
    pub fn in_bounds(&self, archive_len: usize) -> bool {
        self.size != 0 && (self.offset as usize).saturating_add(self.size as usize) <= archive_len
    }
}

/// Table placement parameters.
///
/// Every known archive uses [`ArchiveLayout::default`]; the fields
/// exist so that tests and unusual containers can relocate the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// Byte offset the table starts at.
    pub table_offset: usize,
    /// Maximum number of entries to scan.
    pub max_entries: usize,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            table_offset: TABLE_OFFSET,
            max_entries: MAX_ENTRIES,
        }
    }
}

/// Decoded view of an archive: surviving chunks keyed by hash, plus
/// the manifest name table when the archive carries one.
#[derive(Debug, Default)]
pub struct ArchiveIndex {
    chunks: HashMap<u64, Vec<u8>>,
    manifest: PathManifest,
    skipped_entries: u32,
}

impl ArchiveIndex {
    /// Scans the chunk table at the default layout.
    ///
    /// The `decompressor` is used once, eagerly, on the manifest
    /// chunk; all other payloads are kept raw (see
    /// [`read`][Self::read]).
    pub fn parse(buf: &[u8], decompressor: &dyn Decompressor) -> Self {
        Self::parse_with(buf, decompressor, &ArchiveLayout::default())
    }

    /// Scans the chunk table at an explicit layout.
    ///
    /// Nothing here is fatal: entries whose payload range falls
    /// outside `buf` are skipped and counted, and a missing or
    /// malformed manifest degrades to an empty name table.
    pub fn parse_with(
        buf: &[u8],
        decompressor: &dyn Decompressor,
        layout: &ArchiveLayout,
    ) -> Self {
        let mut chunks: HashMap<u64, Vec<u8>> = HashMap::new();
        let mut skipped_entries = 0u32;

        for n in 0..layout.max_entries {
            let off = layout.table_offset + n * ENTRY_SIZE;
            if off + ENTRY_SIZE > buf.len() {
                break;
            }

            let mut cur = Cursor::new(&buf[off..off + ENTRY_SIZE]);
            let Ok(entry) = ChunkTableEntry::parse(&mut cur) else {
                break;
            };
            if entry.is_terminator() {
                break;
            }
            if !entry.in_bounds(buf.len()) {
                warn!(
                    "skipping corrupt table entry {n}: hash={:#018x} offset={:#x} size={:#x} archive={:#x}",
                    entry.hash,
                    entry.offset,
                    entry.size,
                    buf.len(),
                );
                skipped_entries += 1;
                continue;
            }

            let start = entry.offset as usize;
            let end = start + entry.size as usize;
            // Later occurrence of the same hash replaces the earlier
            // payload: patch layers are appended to the table.
            if chunks
                .insert(entry.hash, buf[start..end].to_vec())
                .is_some()
            {
                debug!("patch layer overrides chunk {:#018x}", entry.hash);
            }
        }

        let manifest = Self::parse_manifest(&chunks, decompressor);
        debug!(
            "archive: {} chunks, {} skipped, {} manifest paths",
            chunks.len(),
            skipped_entries,
            manifest.len(),
        );

        Self {
            chunks,
            manifest,
            skipped_entries,
        }
    }

    fn parse_manifest(
        chunks: &HashMap<u64, Vec<u8>>,
        decompressor: &dyn Decompressor,
    ) -> PathManifest {
        let Some(raw) = chunks.get(&MANIFEST_HASH) else {
            debug!("archive has no manifest chunk");
            return PathManifest::default();
        };
        let decompressed = match maybe_decompress(raw, decompressor) {
            Ok(d) => d,
            Err(e) => {
                warn!("manifest chunk failed to decompress: {e}");
                return PathManifest::default();
            }
        };
        match PathManifest::parse(&decompressed) {
            Ok(m) => m,
            Err(e) => {
                warn!("manifest chunk failed to parse: {e}");
                PathManifest::default()
            }
        }
    }

    /// Number of surviving chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of table entries dropped for being out of bounds.
    pub fn skipped_entries(&self) -> u32 {
        self.skipped_entries
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.chunks.contains_key(&hash)
    }

    /// Raw (possibly still compressed) payload for a chunk.
    pub fn payload(&self, hash: u64) -> Option<&[u8]> {
        self.chunks.get(&hash).map(Vec::as_slice)
    }

    /// Payload for a chunk, decompressed if its magic asks for it.
    pub fn read(&self, hash: u64, decompressor: &dyn Decompressor) -> Result<Cow<'_, [u8]>> {
        let raw = self.payload(hash).ok_or(Error::ChunkNotFound(hash))?;
        Ok(maybe_decompress(raw, decompressor)?)
    }

    /// Hash → path table recovered from the manifest chunk. Empty if
    /// the archive has none.
    pub fn manifest(&self) -> &PathManifest {
        &self.manifest
    }

    /// Iterates surviving chunks as `(hash, raw payload)`.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[u8])> {
        self.chunks.iter().map(|(h, p)| (*h, p.as_slice()))
    }

    /// Iterates surviving chunk hashes.
    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.chunks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_decompress::ZstdDecompressor;

    fn push_entry(buf: &mut Vec<u8>, hash: u64, offset: u32, size: u32) {
        buf.extend_from_slice(&hash.to_le_bytes());
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&size.to_le_bytes());
    }

    /// First byte after a table of `n` entries plus its terminator.
    fn payload_base(n: usize) -> u32 {
        (TABLE_OFFSET + (n + 1) * ENTRY_SIZE) as u32
    }

    /// Archive with the table at the default offset and payload bytes
    /// appended right after the terminator entry.
    fn archive(entries: &[(u64, u32, u32)], payload_area: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; TABLE_OFFSET];
        for &(h, o, s) in entries {
            push_entry(&mut buf, h, o, s);
        }
        push_entry(&mut buf, 0, 0, 0);
        buf.extend_from_slice(payload_area);
        buf
    }

    #[test]
    fn single_entry_stops_at_terminator() {
        // Spec'd example: one entry pointing at 0x138..0x148, then a
        // zero entry. The payload range happens to overlap the
        // terminator entry; ranges may point anywhere in the file.
        let mut buf = vec![0u8; 0x148];
        let mut table = Vec::new();
        push_entry(&mut table, 0x1, 0x138, 0x10);
        buf[TABLE_OFFSET..TABLE_OFFSET + ENTRY_SIZE].copy_from_slice(&table);
        buf[0x138..0x148].copy_from_slice(b"0123456789abcdef");

        let idx = ArchiveIndex::parse(&buf, &ZstdDecompressor);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.payload(0x1), Some(&b"0123456789abcdef"[..]));
        assert_eq!(idx.skipped_entries(), 0);
    }

    #[test]
    fn later_duplicate_wins() {
        let base = payload_base(2);
        let buf = archive(&[(0x42, base, 4), (0x42, base + 4, 4)], b"old!new!");
        let idx = ArchiveIndex::parse(&buf, &ZstdDecompressor);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.payload(0x42), Some(&b"new!"[..]));
    }

    #[test]
    fn corrupt_entries_are_skipped_not_fatal() {
        let base = payload_base(3);
        let buf = archive(
            &[
                (0x1, 0xFFFF_0000, 4), // offset out of bounds
                (0x2, base, 0),        // zero size
                (0x3, base, 4),        // fine
            ],
            b"ok!!",
        );
        let idx = ArchiveIndex::parse(&buf, &ZstdDecompressor);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.payload(0x3), Some(&b"ok!!"[..]));
        assert_eq!(idx.skipped_entries(), 2);
    }

    #[test]
    fn table_running_past_buffer_stops_scan() {
        // Table region ends mid-entry; no terminator.
        let mut buf = vec![0u8; TABLE_OFFSET];
        push_entry(&mut buf, 0x7, TABLE_OFFSET as u32, 4);
        buf.truncate(TABLE_OFFSET + ENTRY_SIZE + 7);

        let idx = ArchiveIndex::parse(&buf, &ZstdDecompressor);
        // The single complete entry points into the table itself,
        // which is in bounds, so it survives.
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn empty_buffer() {
        let idx = ArchiveIndex::parse(&[], &ZstdDecompressor);
        assert!(idx.is_empty());
        assert_eq!(idx.skipped_entries(), 0);
    }

    #[test]
    fn scan_ceiling_is_respected() {
        let base = payload_base(3);
        let buf = archive(
            &[(0x1, base, 1), (0x2, base + 1, 1), (0x3, base + 2, 1)],
            b"abc",
        );
        let layout = ArchiveLayout {
            max_entries: 2,
            ..ArchiveLayout::default()
        };
        let idx = ArchiveIndex::parse_with(&buf, &ZstdDecompressor, &layout);
        assert_eq!(idx.len(), 2);
        assert!(!idx.contains(0x3));
    }

    #[test]
    fn read_decompresses_on_demand() {
        let plain = b"decompressed chunk contents".repeat(4);
        let frame = zstd::stream::encode_all(&plain[..], 0).unwrap();
        let buf = archive(&[(0x9, payload_base(1), frame.len() as u32)], &frame);

        let idx = ArchiveIndex::parse(&buf, &ZstdDecompressor);
        // Raw payload stays compressed.
        assert_eq!(idx.payload(0x9), Some(&frame[..]));
        let out = idx.read(0x9, &ZstdDecompressor).unwrap();
        assert_eq!(&*out, &plain[..]);

        assert!(matches!(
            idx.read(0xdead, &ZstdDecompressor),
            Err(Error::ChunkNotFound(0xdead))
        ));
    }
}
