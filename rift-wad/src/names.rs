//! Hash → path name resolution for archive chunks.
//!
//! Chunk hashes are one-way; recovering a path needs a table. Two
//! sources feed [`NameTable`]: community hash lists (text files of
//! `<hex hash> <path>` lines) and the archive's own manifest chunk,
//! which takes priority because it was written by the same build that
//! produced the archive.
//!
//! Resolution is an optional capability. Everything works with an
//! empty table; unresolved hashes render as fixed-width hex.

use std::{
    collections::HashMap,
    io::BufRead,
    path::Path,
};

use tracing::{debug, warn};

use crate::{Result, manifest::PathManifest};

/// Chunk-hash name resolver.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    names: HashMap<u64, String>,
}

impl NameTable {
    /// Loads a hash list from a reader of `<hex hash> <path>` lines.
    ///
    /// Blank lines, `#` comments, and unparseable lines are skipped
    /// with a warning; a hash list is community data and one bad line
    /// should not discard the rest.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0usize;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((hash_tok, name)) = line.split_once(char::is_whitespace) else {
                warn!("skipping hash list line without a name: {line:?}");
                continue;
            };
            let hash_tok = hash_tok.trim_start_matches("0x");
            let Ok(hash) = u64::from_str_radix(hash_tok, 16) else {
                warn!("skipping hash list line with a bad hash: {line:?}");
                continue;
            };
            self.names.insert(hash, name.trim().to_string());
            added += 1;
        }
        debug!("hash list: {added} entries loaded");
        Ok(added)
    }

    /// Loads a hash list file. Missing files are skipped silently, as
    /// hash lists are optional downloads.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("hash list {} not present, skipping", path.display());
            return Ok(0);
        }
        let file = std::fs::File::open(path)?;
        self.load(std::io::BufReader::new(file))
    }

    /// Merges manifest paths over the loaded lists.
    pub fn merge_manifest(&mut self, manifest: &PathManifest) {
        for (hash, path) in manifest.iter() {
            self.names.insert(hash, path.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for a chunk hash, if known.
    pub fn resolve(&self, hash: u64) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Name for display: the resolved path, or fixed-width hex.
    pub fn display(&self, hash: u64) -> String {
        self.resolve(hash)
            .map_or_else(|| format!("{hash:#018x}"), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn loads_hash_list_lines() {
        let list = "\
# comment line

e1b95dcbcb2bc8f1 assets/characters/aatrox/skins/base/aatrox.skn
0x00000003c0ffee00 data/spells.bin
not-a-hash some/path
lonelytoken
";
        let mut t = NameTable::default();
        let added = t.load(Cursor::new(list)).unwrap();
        assert_eq!(added, 2);
        assert_eq!(
            t.resolve(0xe1b95dcbcb2bc8f1),
            Some("assets/characters/aatrox/skins/base/aatrox.skn")
        );
        assert_eq!(t.resolve(0x3c0ffee00), Some("data/spells.bin"));
    }

    #[test]
    fn display_falls_back_to_hex() {
        let t = NameTable::default();
        assert_eq!(t.display(0x1f), "0x000000000000001f");
    }

    #[test]
    fn manifest_overrides_list() {
        let mut t = NameTable::default();
        t.load(Cursor::new("10 old/name.bin")).unwrap();

        let chunk = {
            let mut buf = Vec::new();
            buf.extend_from_slice(crate::manifest::PATH_MARKER);
            buf.push(0); // align 11 -> 12
            buf.extend_from_slice(&[0u8; 4]);
            buf.extend_from_slice(&1u32.to_le_bytes());
            buf.extend_from_slice(&0x10u64.to_le_bytes());
            buf.extend_from_slice(&12u32.to_le_bytes());
            buf.extend_from_slice(b"new/name.bin");
            buf
        };
        let m = PathManifest::parse(&chunk).unwrap();
        t.merge_manifest(&m);
        assert_eq!(t.resolve(0x10), Some("new/name.bin"));
    }

    #[test]
    fn load_file_skips_missing() {
        let mut t = NameTable::default();
        let added = t.load_file("/definitely/not/here.txt").unwrap();
        assert_eq!(added, 0);
    }
}
