//! Value Codec Module
//!
//! Pure, stateless encoding between [`Value`] and FTS byte buffers.
//!
//! ## Responsibilities
//! - Tag every stored value with a fixed-width type code
//! - Keep numeric scalars distinct from one-element typed arrays
//! - Validate header, tag and payload shape on decode
//!
//! ## File Format
//! ```text
//! ┌───────────┬───────────┬──────────────────────────────┐
//! │ Magic (3) │  Tag (5)  │           Payload            │
//! │   "FTS"   │ "i64s_"…  │ LE numbers / UTF-8 / 0x00|01 │
//! └───────────┴───────────┴──────────────────────────────┘
//! ```

mod fts;
mod tag;
mod value;

pub use fts::{decode, decode_lenient, decode_with, encode, HEADER_SIZE, MAGIC};
pub use tag::{Tag, TAG_LEN};
pub use value::{TypedArray, Value};
