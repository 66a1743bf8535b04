//! FTS type tags
//!
//! The closed set of 5-byte ASCII codes that follow the magic.

/// Width of a type tag in bytes
pub const TAG_LEN: usize = 5;

/// Type tag written after the magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Str,
    Bool,
    Obj,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    /// A lone signed integer (not an array)
    I64Scalar,
    F32,
    F64,
    /// A lone double (not an array)
    F64Scalar,
}

impl Tag {
    /// Every tag, in format table order
    pub const ALL: [Tag; 15] = [
        Tag::Str,
        Tag::Bool,
        Tag::Obj,
        Tag::U8,
        Tag::I8,
        Tag::U16,
        Tag::I16,
        Tag::U32,
        Tag::I32,
        Tag::U64,
        Tag::I64,
        Tag::I64Scalar,
        Tag::F32,
        Tag::F64,
        Tag::F64Scalar,
    ];

    /// The on-disk code for this tag
    pub fn code(self) -> &'static [u8; TAG_LEN] {
        match self {
            Tag::Str => b"str__",
            Tag::Bool => b"bool_",
            Tag::Obj => b"obj__",
            Tag::U8 => b"u8___",
            Tag::I8 => b"i8___",
            Tag::U16 => b"u16__",
            Tag::I16 => b"i16__",
            Tag::U32 => b"u32__",
            Tag::I32 => b"i32__",
            Tag::U64 => b"u64__",
            Tag::I64 => b"i64__",
            Tag::I64Scalar => b"i64s_",
            Tag::F32 => b"f32__",
            Tag::F64 => b"f64__",
            Tag::F64Scalar => b"f64s_",
        }
    }

    /// Look up a tag by its on-disk code
    pub fn from_code(code: &[u8]) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|tag| tag.code() == code)
    }

    /// Byte width of one payload element, for numeric tags
    pub fn element_width(self) -> Option<usize> {
        match self {
            Tag::U8 | Tag::I8 => Some(1),
            Tag::U16 | Tag::I16 => Some(2),
            Tag::U32 | Tag::I32 | Tag::F32 => Some(4),
            Tag::U64 | Tag::I64 | Tag::F64 | Tag::I64Scalar | Tag::F64Scalar => Some(8),
            Tag::Str | Tag::Bool | Tag::Obj => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.code()))
    }
}
