use std::collections::BTreeMap;

/// A decoded GVariant value.
///
/// Arrays of dict entries whose key is a basic text or integer type decode
/// to [`Value::Dict`]; every other array decodes to [`Value::Array`]. A bare
/// dict entry decodes to a two-element [`Value::Tuple`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    Bool(bool),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Maybe(Option<Box<Value>>),
    Tuple(Vec<Value>),
    Array(Vec<Value>),
    Dict(BTreeMap<DictKey, Value>),
    Variant {
        signature: String,
        value: Box<Value>,
    },
}

impl Value {
    /// Short name of the value's shape, used in mismatch errors.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::Bool(_) => "bool",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Maybe(_) => "maybe",
            Value::Tuple(_) => "tuple",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Variant { .. } => "variant",
        }
    }

    /// Shorthand for a present maybe value.
    pub fn just(value: Value) -> Value {
        Value::Maybe(Some(Box::new(value)))
    }

    /// Shorthand for an absent maybe value.
    pub fn nothing() -> Value {
        Value::Maybe(None)
    }

    /// Shorthand for a variant holding `value` under `signature`.
    pub fn variant(signature: &str, value: Value) -> Value {
        Value::Variant {
            signature: signature.to_string(),
            value: Box::new(value),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($from:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$from> for Value {
                fn from(v: $from) -> Value {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    u8 => U8,
    bool => Bool,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f64 => F64,
    String => Str,
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}

/// A dict key in the mapping representation of `a{KV}` arrays.
///
/// Only basic text and integer keys admit the mapping form; dict-entry
/// arrays with any other key type stay sequences of pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DictKey {
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Str(String),
}

impl DictKey {
    pub(crate) fn from_value(value: Value) -> Option<DictKey> {
        match value {
            Value::U8(v) => Some(DictKey::U8(v)),
            Value::I16(v) => Some(DictKey::I16(v)),
            Value::U16(v) => Some(DictKey::U16(v)),
            Value::I32(v) => Some(DictKey::I32(v)),
            Value::U32(v) => Some(DictKey::U32(v)),
            Value::I64(v) => Some(DictKey::I64(v)),
            Value::U64(v) => Some(DictKey::U64(v)),
            Value::Str(v) => Some(DictKey::Str(v)),
            _ => None,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            DictKey::U8(v) => Value::U8(*v),
            DictKey::I16(v) => Value::I16(*v),
            DictKey::U16(v) => Value::U16(*v),
            DictKey::I32(v) => Value::I32(*v),
            DictKey::U32(v) => Value::U32(*v),
            DictKey::I64(v) => Value::I64(*v),
            DictKey::U64(v) => Value::U64(*v),
            DictKey::Str(v) => Value::Str(v.clone()),
        }
    }
}

impl From<&str> for DictKey {
    fn from(v: &str) -> DictKey {
        DictKey::Str(v.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_conversions() {
        for value in [
            Value::U8(7),
            Value::I64(-1),
            Value::Str("k".to_string()),
        ] {
            let key = DictKey::from_value(value.clone()).unwrap();
            assert_eq!(key.to_value(), value);
        }
        assert_eq!(DictKey::from_value(Value::Bool(true)), None);
        assert_eq!(DictKey::from_value(Value::F64(1.0)), None);
        assert_eq!(DictKey::from_value(Value::Tuple(Vec::new())), None);
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(5i32), Value::I32(5));
        assert_eq!(Value::from("hi"), Value::Str("hi".to_string()));
        assert_eq!(Value::just(Value::U8(1)), Value::Maybe(Some(Box::new(Value::U8(1)))));
    }
}
