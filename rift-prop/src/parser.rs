//! PROP file decoding: header, root entries, and the recursive value
//! grammar.
//!
//! A PROP file is `magic | version | linked files | entry hashes |
//! entries`, where each entry and every nested container declares its
//! own byte span. The span checks are load-bearing: a crafted or
//! corrupt file whose declared spans disagree with the decoded
//! contents must fail with [`Error::SizeMismatch`] rather than let
//! the cursor silently resynchronize on garbage. They run in release
//! builds.

use std::collections::BTreeMap;

use rift_decompress::{Decompressor, maybe_decompress};
use tracing::{debug, warn};

use crate::{
    Error, Result, TypeTag,
    cursor::Cursor,
    value::{Field, PropObject, Value, map_insert},
};

/// Magic of the typed value-tree format.
pub const PROP_MAGIC: [u8; 4] = *b"PROP";

/// Magic of the patch wrapper that may enclose a PROP body.
pub const PTCH_MAGIC: [u8; 4] = *b"PTCH";

/// Bytes between the `PTCH` magic and the inner `PROP` magic. Skipped
/// without validation; nothing upstream documents their contents.
pub const PTCH_SKIP: usize = 8;

/// Highest plausible format version; the version-locating heuristic
/// (see [`PropFile::parse`]) hinges on it.
pub const MAX_VERSION: u32 = 10;

/// Deepest container nesting the decoder follows. A crafted file can
/// nest containers arbitrarily; past this cap decoding fails with
/// [`Error::DepthExceeded`] instead of exhausting the stack. Real
/// files nest a handful of levels.
pub const MAX_DEPTH: usize = 128;

/// One root entry: the embed plus the type-hash recorded for it in
/// the header table. The type-hash is kept for cross-checking only;
/// nothing structural depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropEntry {
    pub type_hash: u32,
    pub object: PropObject,
}

/// A fully decoded PROP file.
#[derive(Debug, Clone, PartialEq)]
pub struct PropFile {
    pub version: u32,
    /// Linked file names, present when `version >= 2`.
    pub linked: Vec<String>,
    /// Root embeds keyed by their own name-hash. Name-hash uniqueness
    /// is assumed, not validated; a duplicate silently replaces.
    pub entries: BTreeMap<u32, PropEntry>,
}

impl PropFile {
    /// Decodes a PROP buffer.
    ///
    /// The buffer may start with a `PTCH` wrapper, which is skipped.
    /// The version is located heuristically: the first `u32` after
    /// the magic if it is `<= `[`MAX_VERSION`], else the following
    /// `u32` — a genuine ambiguity in the format, not something this
    /// decoder can resolve exactly. Neither word qualifying is
    /// [`Error::VersionUnresolved`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(data);

        let mut magic: [u8; 4] = cur.take(4)?.try_into().unwrap_or_default();
        if magic == PTCH_MAGIC {
            cur.skip(PTCH_SKIP)?;
            magic = cur.take(4)?.try_into().unwrap_or_default();
        }
        if magic != PROP_MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let version = read_version(&mut cur)?;

        let mut linked = Vec::new();
        if version >= 2 {
            let linked_count = cur.u32()?;
            for _ in 0..linked_count {
                linked.push(cur.string()?);
            }
        }

        let entry_count = cur.u32()?;
        // One u32 type-hash per entry must still fit; bounds the
        // allocation a crafted count could ask for.
        if u64::from(entry_count) * 4 > cur.remaining() as u64 {
            return Err(Error::ImplausibleCount {
                what: "entry",
                count: entry_count,
                remaining: cur.remaining(),
            });
        }

        let mut type_hashes = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            type_hashes.push(cur.u32()?);
        }

        let mut entries = BTreeMap::new();
        for type_hash in type_hashes {
            let entry_len = cur.u32()? as usize;
            let span_start = cur.position();

            // The root embed's own header (name-hash + field count)
            // lies inside the declared span; there is no nested size
            // field like the embedded-object grammar has.
            let name_hash = cur.u32()?;
            let field_count = cur.u16()?;
            let fields = decode_fields(&mut cur, field_count, 0)?;
            check_span("entry", span_start, entry_len, cur.position())?;

            entries.insert(
                name_hash,
                PropEntry {
                    type_hash,
                    object: PropObject { name_hash, fields },
                },
            );
        }

        debug!(
            "PROP v{version}: {} linked, {} entries",
            linked.len(),
            entries.len(),
        );
        Ok(Self {
            version,
            linked,
            entries,
        })
    }

    /// Decodes a buffer that may still be zstd-compressed, as chunks
    /// pulled straight out of an archive are.
    pub fn parse_compressed(data: &[u8], decompressor: &dyn Decompressor) -> Result<Self> {
        let data = maybe_decompress(data, decompressor)?;
        Self::parse(&data)
    }

    /// Root entry by its name-hash.
    pub fn entry(&self, name_hash: u32) -> Option<&PropEntry> {
        self.entries.get(&name_hash)
    }
}

/// Locates the version after the magic. Preserved from the source
/// tooling: whichever of the next two words is `<= MAX_VERSION` is
/// the version, first word preferred.
fn read_version(cur: &mut Cursor<'_>) -> Result<u32> {
    let first = cur.u32()?;
    if first <= MAX_VERSION {
        return Ok(first);
    }
    let second = cur.u32()?;
    if second <= MAX_VERSION {
        warn!("version not in first header word ({first:#x}); using next word {second}");
        return Ok(second);
    }
    Err(Error::VersionUnresolved { first, second })
}

/// Reads a tag byte and requires it to be a known tag.
fn read_tag(cur: &mut Cursor<'_>) -> Result<TypeTag> {
    let offset = cur.position();
    let tag = cur.u8()?;
    TypeTag::from_u8(tag).ok_or(Error::UnknownTypeTag { tag, offset })
}

fn check_span(
    container: &'static str,
    span_start: usize,
    declared: usize,
    actual_end: usize,
) -> Result<()> {
    let expected_end = span_start + declared;
    if actual_end != expected_end {
        return Err(Error::SizeMismatch {
            container,
            expected_end,
            actual_end,
        });
    }
    Ok(())
}

/// Guards an element count against the remaining buffer. Every
/// element encoding is at least one byte, so a count beyond the
/// remaining bytes can only come from corruption; rejecting it up
/// front bounds the work a crafted count can demand.
fn check_count(cur: &Cursor<'_>, what: &'static str, count: u32, min_width: usize) -> Result<()> {
    if u64::from(count) * min_width as u64 > cur.remaining() as u64 {
        return Err(Error::ImplausibleCount {
            what,
            count,
            remaining: cur.remaining(),
        });
    }
    Ok(())
}

fn decode_fields(cur: &mut Cursor<'_>, count: u16, depth: usize) -> Result<Vec<Field>> {
    // name-hash + tag byte per field, before any value bytes.
    check_count(cur, "field", u32::from(count), 5)?;
    let mut fields = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_hash = cur.u32()?;
        let tag = read_tag(cur)?;
        let value = decode_value(cur, tag, depth)?;
        fields.push(Field {
            name_hash,
            tag,
            value,
        });
    }
    Ok(fields)
}

/// Decodes one value of the given tag. Dispatch is a closed match:
/// adding a tag to [`TypeTag`] without handling it here fails to
/// compile. `depth` tracks container nesting, capped at
/// [`MAX_DEPTH`].
pub(crate) fn decode_value(cur: &mut Cursor<'_>, tag: TypeTag, depth: usize) -> Result<Value> {
    if depth >= MAX_DEPTH {
        return Err(Error::DepthExceeded {
            offset: cur.position(),
        });
    }
    Ok(match tag {
        TypeTag::Bool => Value::Bool(cur.u8()? != 0),
        TypeTag::I8 => Value::I8(cur.i8()?),
        TypeTag::U8 => Value::U8(cur.u8()?),
        TypeTag::I16 => Value::I16(cur.i16()?),
        TypeTag::U16 => Value::U16(cur.u16()?),
        TypeTag::I32 => Value::I32(cur.i32()?),
        TypeTag::U32 => Value::U32(cur.u32()?),
        TypeTag::I64 => Value::I64(cur.i64()?),
        TypeTag::U64 => Value::U64(cur.u64()?),
        TypeTag::F32 => Value::F32(cur.f32()?),
        TypeTag::Vec2 => Value::Vec2([cur.f32()?, cur.f32()?]),
        TypeTag::Vec3 => Value::Vec3([cur.f32()?, cur.f32()?, cur.f32()?]),
        TypeTag::Vec4 => Value::Vec4([cur.f32()?, cur.f32()?, cur.f32()?, cur.f32()?]),
        TypeTag::Mtx44 => {
            let mut m = [0f32; 16];
            for slot in &mut m {
                *slot = cur.f32()?;
            }
            Value::Mtx44(m)
        }
        TypeTag::Rgba => Value::Rgba([cur.u8()?, cur.u8()?, cur.u8()?, cur.u8()?]),
        TypeTag::String => Value::String(cur.string()?),
        TypeTag::Hash => Value::Hash(cur.u32()?),
        TypeTag::Link => Value::Link(cur.u32()?),
        TypeTag::File => Value::File(cur.u64()?),
        TypeTag::Option => {
            let item = read_tag(cur)?;
            let count = cur.u8()?;
            let value = if count == 0 {
                None
            } else {
                Some(Box::new(decode_value(cur, item, depth + 1)?))
            };
            Value::Optional { item, value }
        }
        TypeTag::List | TypeTag::List2 => {
            let item = read_tag(cur)?;
            let size = cur.u32()? as usize;
            // The declared span starts here and includes the count
            // word itself.
            let span_start = cur.position();
            let count = cur.u32()?;
            check_count(cur, "list element", count, 1)?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                items.push(decode_value(cur, item, depth + 1)?);
            }
            check_span("list", span_start, size, cur.position())?;
            Value::List { item, items }
        }
        TypeTag::Map => {
            let key = read_tag(cur)?;
            let value = read_tag(cur)?;
            let size = cur.u32()? as usize;
            let span_start = cur.position();
            let count = cur.u32()?;
            check_count(cur, "map entry", count, 2)?;
            let mut entries = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let k = decode_value(cur, key, depth + 1)?;
                let v = decode_value(cur, value, depth + 1)?;
                // Duplicate keys are not rejected; the later one
                // wins.
                map_insert(&mut entries, k, v);
            }
            check_span("map", span_start, size, cur.position())?;
            Value::Map {
                key,
                value,
                entries,
            }
        }
        TypeTag::Embed | TypeTag::Pointer => {
            let name_hash = cur.u32()?;
            let size = cur.u32()? as usize;
            let span_start = cur.position();
            let field_count = cur.u16()?;
            let fields = decode_fields(cur, field_count, depth + 1)?;
            check_span("embed", span_start, size, cur.position())?;
            Value::Object(PropObject { name_hash, fields })
        }
        TypeTag::Flag => Value::Flag(cur.u8()? != 0),
    })
}
