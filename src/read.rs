//! Decoding: drives a [`Type`] over a byte window to yield a [`Value`].
//!
//! Decode is total. Malformed frames produce the type's default value, and
//! every child window is clamped into its parent frame, so arbitrary bytes
//! decode under any signature without errors or panics.

use std::collections::BTreeMap;

use crate::offsets::{cell_width, read_cell};
use crate::signature::{align_up, Type};
use crate::value::{DictKey, Value};

/// Frames nested deeper than this decode to their default value. Signature
/// nesting is already capped by the parser; only variants whose payloads
/// are themselves variants can recurse past it.
const MAX_DEPTH: usize = 512;

pub(crate) fn read(ty: &Type, data: &[u8], start: usize, end: usize, depth: usize) -> Value {
    debug_assert!(start <= end && end <= data.len());
    if depth > MAX_DEPTH {
        return ty.default_value();
    }
    let frame = end - start;
    match ty {
        Type::U8 => Value::U8(if frame == 1 { data[start] } else { 0 }),
        Type::Bool => Value::Bool(frame == 1 && data[start] != 0),
        Type::I16 => Value::I16(if frame == 2 {
            i16::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::U16 => Value::U16(if frame == 2 {
            u16::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::I32 => Value::I32(if frame == 4 {
            i32::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::U32 => Value::U32(if frame == 4 {
            u32::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::I64 => Value::I64(if frame == 8 {
            i64::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::U64 => Value::U64(if frame == 8 {
            u64::from_le_bytes(le_bytes(data, start))
        } else {
            0
        }),
        Type::F64 => Value::F64(if frame == 8 {
            f64::from_le_bytes(le_bytes(data, start))
        } else {
            0.0
        }),
        Type::Str | Type::ObjectPath | Type::Signature => {
            Value::Str(read_text(data, start, end))
        }
        Type::Variant => read_variant(data, start, end, depth),
        Type::Maybe(child) => {
            if start == end {
                return Value::Maybe(None);
            }
            match child.fixed_size() {
                // A fixed-width Just is exactly the payload; any other
                // length means Nothing, not a defaulted payload.
                Some(size) if frame == size => {
                    Value::Maybe(Some(Box::new(read(child, data, start, end, depth + 1))))
                }
                Some(_) => Value::Maybe(None),
                // Variable-width payloads carry a trailing tag byte that
                // distinguishes Just("") from Nothing.
                None => Value::Maybe(Some(Box::new(read(
                    child,
                    data,
                    start,
                    end - 1,
                    depth + 1,
                )))),
            }
        }
        Type::Tuple(children) => {
            let children: Vec<&Type> = children.iter().collect();
            match read_struct(&children, ty.fixed_size(), data, start, end, depth) {
                Some(fields) => Value::Tuple(fields),
                None => ty.default_value(),
            }
        }
        Type::DictEntry(key, value) => {
            let children = [key.as_ref(), value.as_ref()];
            match read_struct(&children, ty.fixed_size(), data, start, end, depth) {
                Some(fields) => Value::Tuple(fields),
                None => ty.default_value(),
            }
        }
        Type::Array(child) => read_array(child, data, start, end, depth),
    }
}

fn le_bytes<const N: usize>(data: &[u8], start: usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&data[start..start + N]);
    out
}

/// Text decodes from `[start, end - 1)` iff the frame ends in NUL; an
/// interior NUL truncates, and a missing terminator yields `""`.
fn read_text(data: &[u8], start: usize, end: usize) -> String {
    if end == start || data[end - 1] != 0 {
        return String::new();
    }
    let bytes = &data[start..end - 1];
    let bytes = match memchr::memchr(0, bytes) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}

/// A variant stores its signature after the payload, separated by the last
/// NUL byte of the frame. A frame with no NUL, or with an unparseable
/// signature, decodes to the default `("()", [])`.
fn read_variant(data: &[u8], start: usize, end: usize, depth: usize) -> Value {
    let frame = &data[start..end];
    let sep = match memchr::memrchr(0, frame) {
        Some(sep) => sep,
        None => return Type::Variant.default_value(),
    };
    let signature = match std::str::from_utf8(&frame[sep + 1..]) {
        Ok(signature) => signature,
        Err(_) => return Type::Variant.default_value(),
    };
    match Type::parse(signature) {
        Ok(child) => Value::Variant {
            signature: signature.to_string(),
            value: Box::new(read(&child, data, start, start + sep, depth + 1)),
        },
        Err(_) => Type::Variant.default_value(),
    }
}

/// The tuple cursor walk, shared with dict entries. Returns `None` when a
/// fixed-size frame has the wrong length, which the caller maps to the
/// container's default.
fn read_struct(
    children: &[&Type],
    fixed: Option<usize>,
    data: &[u8],
    start: usize,
    end: usize,
    depth: usize,
) -> Option<Vec<Value>> {
    let frame = end - start;
    if let Some(size) = fixed {
        if frame != size {
            return None;
        }
    }
    let width = cell_width(frame);
    let mut fields = Vec::with_capacity(children.len());
    let mut cur = start;
    let mut cells = 0;
    for (i, child) in children.iter().enumerate() {
        cur = align_up(cur, child.alignment()).min(end);
        let next = match child.fixed_size() {
            Some(size) => cur.saturating_add(size).min(end),
            None if i + 1 < children.len() => {
                cells += 1;
                let offset = read_cell(data, start, end, cells, width);
                start.saturating_add(offset).clamp(cur, end)
            }
            // The last variable-size child runs to the start of the
            // offset table.
            None => end.saturating_sub(cells * width).max(cur),
        };
        fields.push(read(child, data, cur, next, depth + 1));
        cur = next;
    }
    Some(fields)
}

fn read_array(child: &Type, data: &[u8], start: usize, end: usize, depth: usize) -> Value {
    if start == end {
        return empty_array(child);
    }
    let frame = end - start;
    let elements = match child.fixed_size() {
        Some(size) => {
            if frame % size != 0 {
                return empty_array(child);
            }
            (0..frame / size)
                .map(|i| read(child, data, start + i * size, start + (i + 1) * size, depth + 1))
                .collect()
        }
        None => {
            let width = cell_width(frame);
            // The cell nearest the end holds the end of the last element,
            // which is where the offset table begins; the table length
            // gives the element count.
            let last_end = start
                .saturating_add(read_cell(data, start, end, 1, width))
                .min(end);
            let count = (end - last_end) / width;
            let table_start = end - count * width;
            let mut elements = Vec::with_capacity(count);
            let mut cur = start;
            for i in 0..count {
                let elem_end = start
                    .saturating_add(read_cell(data, start, end, count - i, width))
                    .clamp(cur, table_start);
                elements.push(read(child, data, cur, elem_end, depth + 1));
                cur = align_up(elem_end, child.alignment()).min(table_start);
            }
            elements
        }
    };
    collect_array(child, elements)
}

/// The empty value of an array of `child`: `{}` for dict entries whose key
/// admits the mapping form, `[]` otherwise.
pub(crate) fn empty_array(child: &Type) -> Value {
    if mappable_entry(child) {
        Value::Dict(BTreeMap::new())
    } else {
        Value::Array(Vec::new())
    }
}

/// Dict-entry arrays keyed by basic text or integer types surface as
/// mappings; anything else stays a sequence of pairs.
pub(crate) fn mappable_entry(child: &Type) -> bool {
    match child {
        Type::DictEntry(key, _) => matches!(
            key.as_ref(),
            Type::U8
                | Type::I16
                | Type::U16
                | Type::I32
                | Type::U32
                | Type::I64
                | Type::U64
                | Type::Str
                | Type::ObjectPath
                | Type::Signature
        ),
        _ => false,
    }
}

fn collect_array(child: &Type, elements: Vec<Value>) -> Value {
    if !mappable_entry(child) {
        return Value::Array(elements);
    }
    let mut map = BTreeMap::new();
    for element in elements {
        if let Value::Tuple(mut pair) = element {
            if pair.len() == 2 {
                let value = pair.pop();
                let key = pair.pop().and_then(DictKey::from_value);
                if let (Some(key), Some(value)) = (key, value) {
                    map.insert(key, value);
                }
            }
        }
    }
    Value::Dict(map)
}
