//! Encoding: drives a [`Type`] over a [`Value`], appending the canonical
//! serialized form to a [`ByteBuffer`].

use crate::buffer::ByteBuffer;
use crate::offsets::{table_width, write_table, Direction};
use crate::signature::Type;
use crate::value::Value;
use crate::Error;

pub(crate) fn write(ty: &Type, buf: &mut ByteBuffer, value: &Value) -> Result<(), Error> {
    match (ty, value) {
        (Type::U8, Value::U8(v)) => buf.append_u8(*v),
        (Type::Bool, Value::Bool(v)) => buf.append_u8(u8::from(*v)),
        (Type::I16, Value::I16(v)) => buf.append_i16(*v),
        (Type::U16, Value::U16(v)) => buf.append_u16(*v),
        (Type::I32, Value::I32(v)) => buf.append_i32(*v),
        (Type::U32, Value::U32(v)) => buf.append_u32(*v),
        (Type::I64, Value::I64(v)) => buf.append_i64(*v),
        (Type::U64, Value::U64(v)) => buf.append_u64(*v),
        (Type::F64, Value::F64(v)) => buf.append_f64(*v),
        (Type::Str | Type::ObjectPath | Type::Signature, Value::Str(v)) => {
            buf.append_str(v);
            buf.push(0);
        }
        (Type::Variant, Value::Variant { signature, value }) => {
            let child = Type::parse(signature)?;
            write(&child, buf, value)?;
            buf.push(0);
            buf.append_str(signature);
        }
        (Type::Maybe(child), Value::Maybe(inner)) => {
            buf.align(child.alignment());
            if let Some(inner) = inner {
                write(child, buf, inner)?;
                // The tag byte that distinguishes Just from Nothing for
                // variable-width payloads.
                if !child.is_fixed() {
                    buf.push(0);
                }
            }
        }
        (Type::Tuple(children), Value::Tuple(fields)) if children.len() == fields.len() => {
            let children: Vec<&Type> = children.iter().collect();
            let fields: Vec<&Value> = fields.iter().collect();
            write_struct(&children, &fields, ty.fixed_size(), buf)?;
        }
        (Type::DictEntry(key, val), Value::Tuple(pair)) if pair.len() == 2 => {
            let children = [key.as_ref(), val.as_ref()];
            write_struct(&children, &[&pair[0], &pair[1]], ty.fixed_size(), buf)?;
        }
        (Type::Array(child), _) => write_array(ty, child, buf, value)?,
        _ => return Err(mismatch(ty, value)),
    }
    Ok(())
}

/// The tuple frame writer, shared with dict entries: align-and-write each
/// child, remember where every variable-size child other than the last one
/// ended, then either zero-pad a fixed-size frame to its declared size or
/// append the offset table in reverse recording order.
fn write_struct(
    children: &[&Type],
    values: &[&Value],
    fixed: Option<usize>,
    buf: &mut ByteBuffer,
) -> Result<(), Error> {
    debug_assert_eq!(children.len(), values.len());
    let start = buf.len();
    let mut ends = Vec::new();
    for (i, (child, value)) in children.iter().zip(values).enumerate() {
        buf.align(child.alignment());
        write(child, buf, value)?;
        if !child.is_fixed() && i + 1 < children.len() {
            ends.push(buf.len() - start);
        }
    }
    if let Some(size) = fixed {
        buf.pad(size.saturating_sub(buf.len() - start));
    } else {
        let width = table_width(buf.len() - start, ends.len())?;
        write_table(buf, &ends, width, Direction::Reversed);
    }
    Ok(())
}

/// Arrays accept a sequence of elements or, for dict-entry elements, a
/// mapping, which serializes in enumeration order. Unlike tuples the
/// offset table is written in forward recording order.
fn write_array(
    array_ty: &Type,
    child: &Type,
    buf: &mut ByteBuffer,
    value: &Value,
) -> Result<(), Error> {
    let start = buf.len();
    let fixed = child.fixed_size();
    let mut ends = Vec::new();
    match value {
        Value::Array(elements) => {
            for element in elements {
                buf.align(child.alignment());
                write(child, buf, element)?;
                if fixed.is_none() {
                    ends.push(buf.len() - start);
                }
            }
        }
        Value::Dict(map) => {
            let (key_ty, value_ty) = match child {
                Type::DictEntry(key, value) => (key.as_ref(), value.as_ref()),
                _ => return Err(mismatch(array_ty, value)),
            };
            for (key, val) in map {
                buf.align(child.alignment());
                let key_value = key.to_value();
                write_struct(&[key_ty, value_ty], &[&key_value, val], fixed, buf)?;
                if fixed.is_none() {
                    ends.push(buf.len() - start);
                }
            }
        }
        _ => return Err(mismatch(array_ty, value)),
    }
    if !ends.is_empty() {
        let width = table_width(buf.len() - start, ends.len())?;
        write_table(buf, &ends, width, Direction::Forward);
    }
    Ok(())
}

fn mismatch(ty: &Type, value: &Value) -> Error {
    Error::TypeMismatch {
        expected: ty.to_string(),
        found: value.kind(),
    }
}
