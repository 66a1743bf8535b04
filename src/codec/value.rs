//! Stored value definitions
//!
//! The closed set of variants a store can hold.

use super::Tag;

/// A value held by the store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text (`str__`)
    String(String),

    /// A single boolean (`bool_`)
    Boolean(bool),

    /// A JSON object or array (`obj__`)
    Json(serde_json::Value),

    /// A lone integer (`i64s_`)
    Integer(i64),

    /// A lone double (`f64s_`)
    Float(f64),

    /// A typed numeric array (`u8___` … `f64__`)
    Array(TypedArray),
}

/// An ordered sequence of one numeric width
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Value {
    /// Build a numeric scalar the way a dynamically typed caller would:
    /// integral values in `i64` range become `Integer`, everything else `Float`
    pub fn from_number(n: f64) -> Self {
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Value::Integer(n as i64)
        } else {
            Value::Float(n)
        }
    }

    /// The tag this value encodes to
    pub fn tag(&self) -> Tag {
        match self {
            Value::String(_) => Tag::Str,
            Value::Boolean(_) => Tag::Bool,
            Value::Json(_) => Tag::Obj,
            Value::Integer(_) => Tag::I64Scalar,
            Value::Float(_) => Tag::F64Scalar,
            Value::Array(array) => array.tag(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl TypedArray {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            TypedArray::U8(v) => v.len(),
            TypedArray::I8(v) => v.len(),
            TypedArray::U16(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::U32(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::U64(v) => v.len(),
            TypedArray::I64(v) => v.len(),
            TypedArray::F32(v) => v.len(),
            TypedArray::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tag(&self) -> Tag {
        match self {
            TypedArray::U8(_) => Tag::U8,
            TypedArray::I8(_) => Tag::I8,
            TypedArray::U16(_) => Tag::U16,
            TypedArray::I16(_) => Tag::I16,
            TypedArray::U32(_) => Tag::U32,
            TypedArray::I32(_) => Tag::I32,
            TypedArray::U64(_) => Tag::U64,
            TypedArray::I64(_) => Tag::I64,
            TypedArray::F32(_) => Tag::F32,
            TypedArray::F64(_) => Tag::F64,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Json(json)
    }
}

impl From<TypedArray> for Value {
    fn from(array: TypedArray) -> Self {
        Value::Array(array)
    }
}

macro_rules! typed_array_from_vec {
    ($($elem:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$elem>> for TypedArray {
                fn from(v: Vec<$elem>) -> Self {
                    TypedArray::$variant(v)
                }
            }

            impl From<Vec<$elem>> for Value {
                fn from(v: Vec<$elem>) -> Self {
                    Value::Array(TypedArray::$variant(v))
                }
            }
        )*
    };
}

typed_array_from_vec! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}
