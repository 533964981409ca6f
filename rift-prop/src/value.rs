//! Decoded value trees.
//!
//! Everything here is a fully materialized, owned copy of what was
//! in the source buffer; no node borrows from it. Hash references
//! stay opaque integers — resolving them to names is the
//! [`HashResolver`][crate::HashResolver] capability's job, at display
//! time, never during decode.

use crate::TypeTag;

/// One decoded value node.
///
/// `PartialEq` compares structurally with field and element order
/// preserved, so two decodes of the same buffer compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Row-major, as stored.
    Mtx44([f32; 16]),
    Rgba([u8; 4]),
    String(String),
    /// Opaque 32-bit name hash.
    Hash(u32),
    /// Opaque 32-bit link to another entry.
    Link(u32),
    /// Opaque 64-bit file path hash.
    File(u64),
    /// Homogeneous ordered sequence.
    List {
        item: TypeTag,
        items: Vec<Value>,
    },
    /// Homogeneous key/value pairs in file order.
    Map {
        key: TypeTag,
        value: TypeTag,
        entries: Vec<(Value, Value)>,
    },
    /// Zero or one nested value.
    Optional {
        item: TypeTag,
        value: Option<Box<Value>>,
    },
    /// Named object (an embed or pointer).
    Object(PropObject),
    Flag(bool),
}

/// One named, typed field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name_hash: u32,
    pub tag: TypeTag,
    pub value: Value,
}

/// A named object: a type-name hash and its fields, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct PropObject {
    pub name_hash: u32,
    pub fields: Vec<Field>,
}

impl PropObject {
    /// Field with the given name hash, if present.
    pub fn field(&self, name_hash: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.name_hash == name_hash)
    }

    /// Value of the field with the given name hash.
    pub fn get(&self, name_hash: u32) -> Option<&Value> {
        self.field(name_hash).map(|f| &f.value)
    }
}

/// Inserts into a file-order map, overwriting the value in place when
/// the key is already present (a later duplicate key wins, but keeps
/// the earlier position).
pub(crate) fn map_insert(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_field_lookup() {
        let obj = PropObject {
            name_hash: 0xCAFE,
            fields: vec![
                Field {
                    name_hash: 1,
                    tag: TypeTag::U8,
                    value: Value::U8(7),
                },
                Field {
                    name_hash: 2,
                    tag: TypeTag::Flag,
                    value: Value::Flag(true),
                },
            ],
        };
        assert_eq!(obj.get(2), Some(&Value::Flag(true)));
        assert_eq!(obj.get(3), None);
    }

    #[test]
    fn map_insert_overwrites_in_place() {
        let mut entries = Vec::new();
        map_insert(&mut entries, Value::U8(1), Value::String("a".into()));
        map_insert(&mut entries, Value::U8(2), Value::String("b".into()));
        map_insert(&mut entries, Value::U8(1), Value::String("c".into()));
        assert_eq!(
            entries,
            vec![
                (Value::U8(1), Value::String("c".into())),
                (Value::U8(2), Value::String("b".into())),
            ]
        );
    }
}
