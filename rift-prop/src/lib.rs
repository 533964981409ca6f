//! Decoder for the PROP typed value-tree format.
//!
//! PROP files self-describe nested structured records with 1-byte
//! type tags and explicit byte-length prefixes: primitives, vectors,
//! strings, hashed identifiers, lists, maps, optionals, and embedded
//! sub-objects. This crate decodes one fully-resident buffer into an
//! immutable [`Value`] tree, validating every container's declared
//! byte span along the way.
//!
//! Decoding is synchronous and shares nothing between calls;
//! decoding many buffers in parallel needs no coordination.
//!
//! ```
//! use rift_prop::{PropFile, NullResolver, dump_text};
//!
//! // PROP v1, zero entries.
//! let data = [
//!     b'P', b'R', b'O', b'P',
//!     1, 0, 0, 0, // version
//!     0, 0, 0, 0, // entry count
//! ];
//! let file = PropFile::parse(&data)?;
//! assert_eq!(file.version, 1);
//! assert!(file.entries.is_empty());
//! println!("{}", dump_text(&file, &NullResolver));
//! # Ok::<(), rift_prop::Error>(())
//! ```

mod cursor;
mod error;
mod names;
pub mod parser;
mod tag;
mod text;
mod value;

pub use error::{Error, Result};
pub use names::{HashDb, HashResolver, NullResolver};
pub use parser::{MAX_DEPTH, MAX_VERSION, PROP_MAGIC, PTCH_MAGIC, PTCH_SKIP, PropEntry, PropFile};
pub use tag::TypeTag;
pub use text::dump_text;
pub use value::{Field, PropObject, Value};
