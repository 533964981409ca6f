//! Hash → name resolution for decoded trees.
//!
//! Field names, object type names, and link targets are stored as
//! hashes; the original names live in community-maintained hash list
//! files. Resolution is an optional capability: a decoded tree is
//! fully usable with [`NullResolver`], rendering every reference as
//! fixed-width hex.

use std::{
    collections::HashMap,
    io::BufRead,
    path::Path,
};

use tracing::{debug, warn};

use crate::Result;

/// Name-resolution capability for hash references.
///
/// The two widths share a namespace here: 32-bit field/type hashes
/// and 64-bit file-path hashes both resolve through the same lookup,
/// as the hash list files mix them freely.
pub trait HashResolver {
    /// Name for a 32-bit hash, if known.
    fn resolve32(&self, hash: u32) -> Option<&str>;

    /// Name for a 64-bit hash, if known.
    fn resolve64(&self, hash: u64) -> Option<&str>;

    /// Display form of a 32-bit hash: the name, or zero-padded hex.
    fn display32(&self, hash: u32) -> String {
        self.resolve32(hash)
            .map_or_else(|| format!("{hash:#010x}"), str::to_string)
    }

    /// Display form of a 64-bit hash: the name, or zero-padded hex.
    fn display64(&self, hash: u64) -> String {
        self.resolve64(hash)
            .map_or_else(|| format!("{hash:#018x}"), str::to_string)
    }
}

/// Resolver with no tables loaded; everything renders as hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl HashResolver for NullResolver {
    fn resolve32(&self, _hash: u32) -> Option<&str> {
        None
    }

    fn resolve64(&self, _hash: u64) -> Option<&str> {
        None
    }
}

/// Hash database loaded from `hashes.*.txt` list files.
///
/// Line format: a hash token (`0x`-prefixed hex, bare hex, or
/// decimal) followed by whitespace and the name. Blank lines and `#`
/// comments are skipped.
#[derive(Debug, Default, Clone)]
pub struct HashDb {
    names: HashMap<u64, String>,
}

impl HashDb {
    /// Loads entries from a reader of hash list lines. Unparseable
    /// lines are skipped with a warning.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0usize;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((tok, name)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let Some(hash) = parse_hash_token(tok) else {
                warn!("skipping hash line with a bad token: {line:?}");
                continue;
            };
            self.names.insert(hash, name.trim().to_string());
            added += 1;
        }
        Ok(added)
    }

    /// Loads one hash list file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let file = std::fs::File::open(path.as_ref())?;
        self.load(std::io::BufReader::new(file))
    }

    /// Loads every `hashes.*.txt*` file in a directory. Missing
    /// directories yield an empty database, not an error; hash lists
    /// are optional downloads.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            debug!("hash directory {} not present", dir.display());
            return Ok(0);
        }
        let mut added = 0usize;
        for dent in std::fs::read_dir(dir)? {
            let dent = dent?;
            let name = dent.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("hashes.") && name.contains(".txt") {
                added += self.load_file(dent.path())?;
            }
        }
        debug!("hash db: {added} entries from {}", dir.display());
        Ok(added)
    }

    pub fn insert(&mut self, hash: u64, name: impl Into<String>) {
        self.names.insert(hash, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl HashResolver for HashDb {
    fn resolve32(&self, hash: u32) -> Option<&str> {
        self.names.get(&u64::from(hash)).map(String::as_str)
    }

    fn resolve64(&self, hash: u64) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }
}

/// Accepts `0xDEADBEEF`, plain decimal, or bare hex.
fn parse_hash_token(tok: &str) -> Option<u64> {
    if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    tok.parse::<u64>()
        .ok()
        .or_else(|| u64::from_str_radix(tok, 16).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn token_forms() {
        assert_eq!(parse_hash_token("0xDEADBEEF"), Some(0xDEADBEEF));
        assert_eq!(parse_hash_token("0Xdeadbeef"), Some(0xDEADBEEF));
        assert_eq!(parse_hash_token("12345"), Some(12345));
        assert_eq!(parse_hash_token("deadbeef"), Some(0xDEADBEEF));
        assert_eq!(parse_hash_token("zzz"), None);
    }

    #[test]
    fn load_and_resolve() {
        let list = "\
# bin field hashes
0x12345678 mSpellName
abcdef01 mTooltip
42 answer
";
        let mut db = HashDb::default();
        let added = db.load(Cursor::new(list)).unwrap();
        assert_eq!(added, 3);
        assert_eq!(db.resolve32(0x12345678), Some("mSpellName"));
        assert_eq!(db.resolve32(0xabcdef01), Some("mTooltip"));
        assert_eq!(db.resolve64(42), Some("answer"));
    }

    #[test]
    fn hex_fallback_widths() {
        let db = HashDb::default();
        assert_eq!(db.display32(0xBEEF), "0x0000beef");
        assert_eq!(db.display64(0xBEEF), "0x000000000000beef");
    }

    #[test]
    fn load_dir_picks_hash_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hashes.binfields.txt"), "0x1 one\n").unwrap();
        std::fs::write(dir.path().join("hashes.game.txt.0"), "0x2 two\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "0x3 three\n").unwrap();

        let mut db = HashDb::default();
        let added = db.load_dir(dir.path()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(db.resolve32(3), None);
    }

    #[test]
    fn missing_dir_is_empty() {
        let mut db = HashDb::default();
        assert_eq!(db.load_dir("/no/such/dir").unwrap(), 0);
        assert!(db.is_empty());
    }
}
