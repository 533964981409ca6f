//! Reader for WAD asset archives.
//!
//! A WAD archive packs many independently compressed assets behind a
//! flat offset/size table keyed by 64-bit path hashes. This crate
//! scans that table into an [`ArchiveIndex`], merging patch layers
//! (the last table entry for a hash wins) and skipping corrupt
//! entries instead of failing the whole archive.
//!
//! Archives built with an embedded manifest also get their
//! `pathHashes` table decoded ([`PathManifest`]), which maps chunk
//! hashes back to real paths; [`NameTable`] combines that with
//! community hash lists for display and extraction.

mod archive;
mod detect;
mod error;
mod manifest;
mod names;

pub use archive::{
    ArchiveIndex, ArchiveLayout, ChunkTableEntry, ENTRY_SIZE, MANIFEST_HASH, MAX_ENTRIES,
    TABLE_OFFSET,
};
pub use detect::{default_file_name, guess_extension};
pub use error::{Error, Result};
pub use manifest::{PATH_MARKER, PathManifest};
pub use names::NameTable;
