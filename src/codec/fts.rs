//! FTS encode/decode
//!
//! Header layout and payload rules for every [`Tag`].

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, StoreError};

use super::{Tag, TypedArray, Value, TAG_LEN};

/// Magic bytes at offset 0
pub const MAGIC: &[u8; 3] = b"FTS";

/// Header size: 3 bytes magic + 5 bytes tag
pub const HEADER_SIZE: usize = MAGIC.len() + TAG_LEN;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a value into an FTS buffer
pub fn encode(value: &Value) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_size_hint(value));
    buf.put_slice(MAGIC);
    buf.put_slice(value.tag().code());

    match value {
        Value::String(s) => buf.put_slice(s.as_bytes()),
        Value::Boolean(b) => buf.put_u8(u8::from(*b)),
        Value::Json(json) => buf.put_slice(json.to_string().as_bytes()),
        Value::Integer(n) => buf.put_i64_le(*n),
        Value::Float(n) => buf.put_f64_le(*n),
        Value::Array(array) => encode_array(&mut buf, array),
    }

    buf.freeze()
}

fn encode_array(buf: &mut BytesMut, array: &TypedArray) {
    match array {
        TypedArray::U8(v) => buf.put_slice(v),
        TypedArray::I8(v) => v.iter().for_each(|&x| buf.put_i8(x)),
        TypedArray::U16(v) => v.iter().for_each(|&x| buf.put_u16_le(x)),
        TypedArray::I16(v) => v.iter().for_each(|&x| buf.put_i16_le(x)),
        TypedArray::U32(v) => v.iter().for_each(|&x| buf.put_u32_le(x)),
        TypedArray::I32(v) => v.iter().for_each(|&x| buf.put_i32_le(x)),
        TypedArray::U64(v) => v.iter().for_each(|&x| buf.put_u64_le(x)),
        TypedArray::I64(v) => v.iter().for_each(|&x| buf.put_i64_le(x)),
        TypedArray::F32(v) => v.iter().for_each(|&x| buf.put_f32_le(x)),
        TypedArray::F64(v) => v.iter().for_each(|&x| buf.put_f64_le(x)),
    }
}

fn payload_size_hint(value: &Value) -> usize {
    match value {
        Value::String(s) => s.len(),
        Value::Boolean(_) => 1,
        Value::Json(_) => 64,
        Value::Integer(_) | Value::Float(_) => 8,
        Value::Array(array) => array.len() * array.tag().element_width().unwrap_or(1),
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an FTS buffer, failing with `MalformedBuffer` on any violation
pub fn decode(buf: &[u8]) -> Result<Value> {
    if buf.len() < HEADER_SIZE {
        return Err(malformed(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            buf.len()
        )));
    }

    let (magic, rest) = buf.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(malformed(format!("Bad magic: {:?}", magic)));
    }

    let (code, payload) = rest.split_at(TAG_LEN);
    let tag = Tag::from_code(code).ok_or_else(|| {
        malformed(format!("Unknown type tag: {:?}", String::from_utf8_lossy(code)))
    })?;

    decode_payload(tag, payload)
}

/// Decode an FTS buffer, returning `None` instead of an error
pub fn decode_lenient(buf: &[u8]) -> Option<Value> {
    decode(buf).ok()
}

/// Decode with the strictness chosen by the caller
///
/// - `strict = true`: malformed buffers surface as `Err(MalformedBuffer)`
/// - `strict = false`: malformed buffers yield `Ok(None)`
pub fn decode_with(buf: &[u8], strict: bool) -> Result<Option<Value>> {
    match decode(buf) {
        Ok(value) => Ok(Some(value)),
        Err(e) if !strict && e.is_malformed() => Ok(None),
        Err(e) => Err(e),
    }
}

fn decode_payload(tag: Tag, payload: &[u8]) -> Result<Value> {
    if let Some(width) = tag.element_width() {
        if payload.len() % width != 0 {
            return Err(malformed(format!(
                "{} payload of {} bytes is not a multiple of {}",
                tag,
                payload.len(),
                width
            )));
        }
    }

    let value = match tag {
        Tag::Str => {
            let s = std::str::from_utf8(payload)
                .map_err(|e| malformed(format!("str__ payload is not UTF-8: {}", e)))?;
            Value::String(s.to_string())
        }
        Tag::Bool => match payload {
            [0] => Value::Boolean(false),
            [1] => Value::Boolean(true),
            _ => return Err(malformed(format!("bool_ payload must be one 0x00/0x01 byte, got {:?}", payload))),
        },
        Tag::Obj => {
            let json = serde_json::from_slice(payload)
                .map_err(|e| malformed(format!("obj__ payload is not JSON: {}", e)))?;
            Value::Json(json)
        }
        Tag::I64Scalar => Value::Integer(scalar(tag, payload)?.get_i64_le()),
        Tag::F64Scalar => Value::Float(scalar(tag, payload)?.get_f64_le()),
        Tag::U8 => Value::Array(TypedArray::U8(payload.to_vec())),
        Tag::I8 => Value::Array(TypedArray::I8(read_all(payload, |p| p.get_i8()))),
        Tag::U16 => Value::Array(TypedArray::U16(read_all(payload, |p| p.get_u16_le()))),
        Tag::I16 => Value::Array(TypedArray::I16(read_all(payload, |p| p.get_i16_le()))),
        Tag::U32 => Value::Array(TypedArray::U32(read_all(payload, |p| p.get_u32_le()))),
        Tag::I32 => Value::Array(TypedArray::I32(read_all(payload, |p| p.get_i32_le()))),
        Tag::U64 => Value::Array(TypedArray::U64(read_all(payload, |p| p.get_u64_le()))),
        Tag::I64 => Value::Array(TypedArray::I64(read_all(payload, |p| p.get_i64_le()))),
        Tag::F32 => Value::Array(TypedArray::F32(read_all(payload, |p| p.get_f32_le()))),
        Tag::F64 => Value::Array(TypedArray::F64(read_all(payload, |p| p.get_f64_le()))),
    };

    Ok(value)
}

/// Scalar payloads hold exactly one 8-byte element
fn scalar(tag: Tag, payload: &[u8]) -> Result<&[u8]> {
    if payload.len() != 8 {
        return Err(malformed(format!(
            "{} payload must be 8 bytes, got {}",
            tag,
            payload.len()
        )));
    }
    Ok(payload)
}

/// Read elements until the payload is exhausted (length already validated)
fn read_all<T>(mut payload: &[u8], mut read: impl FnMut(&mut &[u8]) -> T) -> Vec<T> {
    let mut out = Vec::new();
    while payload.has_remaining() {
        out.push(read(&mut payload));
    }
    out
}

fn malformed(reason: String) -> StoreError {
    StoreError::MalformedBuffer(reason)
}
