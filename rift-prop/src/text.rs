//! Text rendering of decoded trees, in the conventional dump format
//! (`#PROP_text` header, `name: type = value` lines).
//!
//! Hash references are rendered through a [`HashResolver`]; with no
//! tables loaded everything comes out as fixed-width hex, which is
//! still diffable and greppable.

use std::fmt::Write;

use crate::{HashResolver, PropFile, Value, value::PropObject};

const INDENT: &str = "  ";

/// Renders a decoded file as text.
pub fn dump_text(file: &PropFile, resolver: &dyn HashResolver) -> String {
    let mut d = Dumper {
        out: String::new(),
        resolver,
    };
    d.line(0, "#PROP_text");
    d.line(0, "type: string = \"PROP\"");
    let _ = writeln!(d.out, "version: u32 = {}", file.version);

    if !file.linked.is_empty() {
        d.line(0, "linked: list[string] = {");
        for name in &file.linked {
            let _ = writeln!(d.out, "{INDENT}{name:?}");
        }
        d.line(0, "}");
    }

    d.line(0, "entries: map[hash,embed] = {");
    for entry in file.entries.values() {
        let _ = write!(
            d.out,
            "{INDENT}{} = ",
            d.resolver.display32(entry.object.name_hash)
        );
        d.object(&entry.object, 1);
        d.out.push('\n');
    }
    d.line(0, "}");
    d.out
}

struct Dumper<'a> {
    out: String,
    resolver: &'a dyn HashResolver,
}

impl Dumper<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn pad(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    /// Writes an object as `TypeName { fields }`, leaving the cursor
    /// after the closing brace.
    fn object(&mut self, obj: &PropObject, depth: usize) {
        let type_name = self.resolver.display32(obj.name_hash);
        if obj.fields.is_empty() {
            let _ = write!(self.out, "{type_name} {{}}");
            return;
        }
        let _ = writeln!(self.out, "{type_name} {{");
        for field in &obj.fields {
            self.pad(depth + 1);
            let _ = write!(
                self.out,
                "{}: {} = ",
                self.resolver.display32(field.name_hash),
                field.tag.name(),
            );
            self.value(&field.value, depth + 1);
            self.out.push('\n');
        }
        self.pad(depth);
        self.out.push('}');
    }

    /// Writes a value inline, without a trailing newline.
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Bool(b) | Value::Flag(b) => {
                self.out.push_str(if *b { "true" } else { "false" });
            }
            Value::I8(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::U8(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::I16(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::U16(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::I32(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::U32(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::I64(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::U64(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::F32(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::Vec2(v) => self.floats(v),
            Value::Vec3(v) => self.floats(v),
            Value::Vec4(v) => self.floats(v),
            Value::Mtx44(v) => self.floats(v),
            Value::Rgba([r, g, b, a]) => {
                let _ = write!(self.out, "{{ {r}, {g}, {b}, {a} }}");
            }
            Value::String(s) => {
                let _ = write!(self.out, "{s:?}");
            }
            Value::Hash(h) => {
                let _ = write!(self.out, "{}", self.resolver.display32(*h));
            }
            Value::Link(h) => {
                let _ = write!(self.out, "{}", self.resolver.display32(*h));
            }
            Value::File(h) => {
                let _ = write!(self.out, "{}", self.resolver.display64(*h));
            }
            Value::List { items, .. } => {
                if items.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{\n");
                for item in items {
                    self.pad(depth + 1);
                    self.value(item, depth + 1);
                    self.out.push('\n');
                }
                self.pad(depth);
                self.out.push('}');
            }
            Value::Map { entries, .. } => {
                if entries.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{\n");
                for (k, v) in entries {
                    self.pad(depth + 1);
                    self.value(k, depth + 1);
                    self.out.push_str(" = ");
                    self.value(v, depth + 1);
                    self.out.push('\n');
                }
                self.pad(depth);
                self.out.push('}');
            }
            Value::Optional { value, .. } => match value {
                None => self.out.push_str("{}"),
                Some(inner) => {
                    self.out.push_str("{ ");
                    self.value(inner, depth);
                    self.out.push_str(" }");
                }
            },
            Value::Object(obj) => self.object(obj, depth),
        }
    }

    fn floats(&mut self, vals: &[f32]) {
        self.out.push_str("{ ");
        for (i, v) in vals.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let _ = write!(self.out, "{v}");
        }
        self.out.push_str(" }");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashDb, NullResolver, TypeTag, parser::PropEntry, value::Field};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn sample_file() -> PropFile {
        let object = PropObject {
            name_hash: 0x11,
            fields: vec![
                Field {
                    name_hash: 0x22,
                    tag: TypeTag::String,
                    value: Value::String("ahri".into()),
                },
                Field {
                    name_hash: 0x33,
                    tag: TypeTag::List,
                    value: Value::List {
                        item: TypeTag::U8,
                        items: vec![Value::U8(1), Value::U8(2)],
                    },
                },
                Field {
                    name_hash: 0x44,
                    tag: TypeTag::Hash,
                    value: Value::Hash(0x55),
                },
            ],
        };
        let mut entries = BTreeMap::new();
        entries.insert(
            0x11,
            PropEntry {
                type_hash: 0xAA,
                object,
            },
        );
        PropFile {
            version: 3,
            linked: vec!["DATA/base.bin".into()],
            entries,
        }
    }

    #[test]
    fn dump_with_null_resolver() {
        let text = dump_text(&sample_file(), &NullResolver);
        let expected = "\
#PROP_text
type: string = \"PROP\"
version: u32 = 3
linked: list[string] = {
  \"DATA/base.bin\"
}
entries: map[hash,embed] = {
  0x00000011 = 0x00000011 {
    0x00000022: string = \"ahri\"
    0x00000033: list = {
      1
      2
    }
    0x00000044: hash = 0x00000055
  }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn dump_resolves_names() {
        let mut db = HashDb::default();
        db.insert(0x11, "CharacterRecord");
        db.insert(0x22, "mName");
        let text = dump_text(&sample_file(), &db);
        assert!(text.contains("CharacterRecord = CharacterRecord {"));
        assert!(text.contains("mName: string = \"ahri\""));
        assert!(text.contains("0x00000044: hash = 0x00000055"));
    }
}
