//! Codec for the GVariant binary serialization format.
//!
//! GVariant is the type-tagged, little-endian wire format used across the
//! GLib and D-Bus ecosystem. A value's layout is fully determined by its
//! type signature: fixed-width types pack at their natural alignment, and
//! variable-width containers frame their children with a table of offsets
//! stored at the tail of the frame.
//!
//! The two entry points mirror the two directions of the codec:
//!
//! ```
//! use gvariant_codec::{parse, serialize, Value};
//!
//! let bytes = serialize("(si)", &Value::Tuple(vec![
//!     Value::from("ab"),
//!     Value::I32(1),
//! ])).unwrap();
//! assert_eq!(bytes, [0x61, 0x62, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03]);
//! assert_eq!(parse("(si)", &bytes).unwrap(), Value::Tuple(vec![
//!     Value::from("ab"),
//!     Value::I32(1),
//! ]));
//! ```
//!
//! Decoding is total: any byte sequence is interpretable under any
//! signature, with malformed frames yielding the type's default value
//! instead of an error. The only failures `parse` reports are malformed
//! signatures; `serialize` additionally reports values whose shape does not
//! match the signature and frames too large for the 4-byte framing offsets.

pub use crate::buffer::ByteBuffer;
pub use crate::error::Error;
pub use crate::signature::{SignatureError, Type};
pub use crate::value::{DictKey, Value};

/// Appendable, alignment-aware output buffer
mod buffer;
mod error;
/// Framing-offset cells at the tail of variable-size frames
mod offsets;
/// Decode a byte window into a value
mod read;
/// Type descriptors and the signature parser
pub mod signature;
mod value;
/// Encode a value into a buffer
mod write;

/// Decode `data` as a value of the type described by `signature`.
///
/// The signature must describe exactly one complete type. Decoding itself
/// never fails: malformed frames decode to the type's default value.
pub fn parse(signature: &str, data: &[u8]) -> Result<Value, Error> {
    let ty = Type::parse(signature)?;
    Ok(ty.read(data))
}

/// Encode `value` under the type described by `signature` into canonical
/// GVariant bytes.
pub fn serialize(signature: &str, value: &Value) -> Result<Vec<u8>, Error> {
    let ty = Type::parse(signature)?;
    let mut buf = ByteBuffer::new();
    ty.write(&mut buf, value)?;
    Ok(buf.into_bytes())
}
