//! The 1-byte type tags of the PROP value grammar.
//!
//! The tag space is closed: dispatch is an exhaustive `match` over
//! this enum, so a tag the decoder does not handle is impossible to
//! reach once [`TypeTag::from_u8`] has accepted the byte. Tag bytes
//! outside the enum are a hard error at the read site — a value of
//! unknown tag has unknown width and cannot be skipped.

/// Container tags have the high bit set.
const CONTAINER_BIT: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Bool = 1,
    I8 = 2,
    U8 = 3,
    I16 = 4,
    U16 = 5,
    I32 = 6,
    U32 = 7,
    I64 = 8,
    U64 = 9,
    F32 = 10,
    Vec2 = 11,
    Vec3 = 12,
    Vec4 = 13,
    Mtx44 = 14,
    Rgba = 15,
    String = 16,
    Hash = 17,
    File = 18,
    List = CONTAINER_BIT,
    List2 = CONTAINER_BIT | 1,
    Pointer = CONTAINER_BIT | 2,
    Embed = CONTAINER_BIT | 3,
    Link = CONTAINER_BIT | 4,
    Option = CONTAINER_BIT | 5,
    Map = CONTAINER_BIT | 6,
    Flag = CONTAINER_BIT | 7,
}

impl TypeTag {
    /// Maps a tag byte onto the closed enum.
    pub fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => Self::Bool,
            2 => Self::I8,
            3 => Self::U8,
            4 => Self::I16,
            5 => Self::U16,
            6 => Self::I32,
            7 => Self::U32,
            8 => Self::I64,
            9 => Self::U64,
            10 => Self::F32,
            11 => Self::Vec2,
            12 => Self::Vec3,
            13 => Self::Vec4,
            14 => Self::Mtx44,
            15 => Self::Rgba,
            16 => Self::String,
            17 => Self::Hash,
            18 => Self::File,
            0x80 => Self::List,
            0x81 => Self::List2,
            0x82 => Self::Pointer,
            0x83 => Self::Embed,
            0x84 => Self::Link,
            0x85 => Self::Option,
            0x86 => Self::Map,
            0x87 => Self::Flag,
            _ => return None,
        })
    }

    /// Whether the tag's encoding nests further tagged values.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::List | Self::List2 | Self::Pointer | Self::Embed | Self::Option | Self::Map
        )
    }

    /// Lowercase name as used in the text dump.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mtx44 => "mtx44",
            Self::Rgba => "rgba",
            Self::String => "string",
            Self::Hash => "hash",
            Self::File => "file",
            Self::List => "list",
            Self::List2 => "list2",
            Self::Pointer => "pointer",
            Self::Embed => "embed",
            Self::Link => "link",
            Self::Option => "option",
            Self::Map => "map",
            Self::Flag => "flag",
        }
    }
}
