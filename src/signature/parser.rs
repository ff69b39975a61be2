use super::error::SignatureError;
use super::Type;

type Result<T> = std::result::Result<T, SignatureError>;

/// Containers deeper than this are rejected outright. GVariant signatures
/// found in the wild stay in single digits; the cap keeps the recursive
/// parser and the readers built on it within a bounded stack.
const MAX_DEPTH: usize = 64;

/// Parse a signature describing exactly one complete type.
pub fn parse_type(signature: &str) -> Result<Type> {
    let sig = signature.as_bytes();
    let (ty, consumed) = next_type(sig, 0, 0)?;
    if consumed != sig.len() {
        return Err(SignatureError::TrailingCharacters);
    }
    Ok(ty)
}

/// Parse the next complete type starting at `index`, returning it together
/// with the number of signature bytes it consumed.
pub fn next_type(sig: &[u8], index: usize, depth: usize) -> Result<(Type, usize)> {
    if depth > MAX_DEPTH {
        return Err(SignatureError::NestingTooDeep);
    }
    match sig.get(index) {
        None => Err(SignatureError::UnexpectedEnd),
        Some(b'y') => Ok((Type::U8, 1)),
        Some(b'b') => Ok((Type::Bool, 1)),
        Some(b'n') => Ok((Type::I16, 1)),
        Some(b'q') => Ok((Type::U16, 1)),
        Some(b'i') => Ok((Type::I32, 1)),
        Some(b'u') => Ok((Type::U32, 1)),
        Some(b'x') => Ok((Type::I64, 1)),
        Some(b't') => Ok((Type::U64, 1)),
        Some(b'd') => Ok((Type::F64, 1)),
        Some(b's') => Ok((Type::Str, 1)),
        Some(b'o') => Ok((Type::ObjectPath, 1)),
        Some(b'g') => Ok((Type::Signature, 1)),
        Some(b'v') => Ok((Type::Variant, 1)),
        Some(b'm') => {
            let (child, consumed) = next_type(sig, index + 1, depth + 1)?;
            Ok((Type::Maybe(Box::new(child)), consumed + 1))
        }
        Some(b'a') => {
            let (child, consumed) = next_type(sig, index + 1, depth + 1)?;
            Ok((Type::Array(Box::new(child)), consumed + 1))
        }
        Some(b'(') => {
            let mut children = Vec::new();
            let mut pos = index + 1;
            loop {
                match sig.get(pos) {
                    None => return Err(SignatureError::UnexpectedEnd),
                    Some(b')') => break,
                    Some(_) => {
                        let (child, consumed) = next_type(sig, pos, depth + 1)?;
                        children.push(child);
                        pos += consumed;
                    }
                }
            }
            Ok((Type::Tuple(children), pos - index + 1))
        }
        Some(b'{') => {
            let (key, key_len) = next_type(sig, index + 1, depth + 1)?;
            let (value, value_len) = next_type(sig, index + 1 + key_len, depth + 1)?;
            match sig.get(index + 1 + key_len + value_len) {
                None => Err(SignatureError::UnexpectedEnd),
                Some(b'}') => Ok((
                    Type::DictEntry(Box::new(key), Box::new(value)),
                    key_len + value_len + 2,
                )),
                Some(_) => Err(SignatureError::ExpectedCloseBrace),
            }
        }
        Some(&c) => Err(SignatureError::UnknownTypeCode(char::from(c))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_leaves() {
        assert_eq!(parse_type("y").unwrap(), Type::U8);
        assert_eq!(parse_type("b").unwrap(), Type::Bool);
        assert_eq!(parse_type("n").unwrap(), Type::I16);
        assert_eq!(parse_type("q").unwrap(), Type::U16);
        assert_eq!(parse_type("i").unwrap(), Type::I32);
        assert_eq!(parse_type("u").unwrap(), Type::U32);
        assert_eq!(parse_type("x").unwrap(), Type::I64);
        assert_eq!(parse_type("t").unwrap(), Type::U64);
        assert_eq!(parse_type("d").unwrap(), Type::F64);
        assert_eq!(parse_type("s").unwrap(), Type::Str);
        assert_eq!(parse_type("o").unwrap(), Type::ObjectPath);
        assert_eq!(parse_type("g").unwrap(), Type::Signature);
        assert_eq!(parse_type("v").unwrap(), Type::Variant);
    }

    #[test]
    fn test_composites() {
        assert_eq!(
            parse_type("mi").unwrap(),
            Type::Maybe(Box::new(Type::I32))
        );
        assert_eq!(
            parse_type("aay").unwrap(),
            Type::Array(Box::new(Type::Array(Box::new(Type::U8))))
        );
        assert_eq!(parse_type("()").unwrap(), Type::Tuple(Vec::new()));
        assert_eq!(
            parse_type("(si)").unwrap(),
            Type::Tuple(vec![Type::Str, Type::I32])
        );
        assert_eq!(
            parse_type("{sv}").unwrap(),
            Type::DictEntry(Box::new(Type::Str), Box::new(Type::Variant))
        );
        assert_eq!(
            parse_type("a{s(iu)}").unwrap(),
            Type::Array(Box::new(Type::DictEntry(
                Box::new(Type::Str),
                Box::new(Type::Tuple(vec![Type::I32, Type::U32])),
            )))
        );
    }

    #[test]
    fn test_consumed_lengths() {
        let sig = b"a{sv}i";
        let (ty, consumed) = next_type(sig, 0, 0).unwrap();
        assert_eq!(consumed, 5);
        assert!(matches!(ty, Type::Array(_)));
        let (ty, consumed) = next_type(sig, 5, 0).unwrap();
        assert_eq!((ty, consumed), (Type::I32, 1));
    }

    #[test]
    fn test_bad_signatures() {
        assert_eq!(parse_type("").unwrap_err(), SignatureError::UnexpectedEnd);
        assert_eq!(parse_type("a").unwrap_err(), SignatureError::UnexpectedEnd);
        assert_eq!(parse_type("m").unwrap_err(), SignatureError::UnexpectedEnd);
        assert_eq!(parse_type("(i").unwrap_err(), SignatureError::UnexpectedEnd);
        assert_eq!(parse_type("{sv").unwrap_err(), SignatureError::UnexpectedEnd);
        assert_eq!(
            parse_type("ii").unwrap_err(),
            SignatureError::TrailingCharacters
        );
        assert_eq!(
            parse_type("z").unwrap_err(),
            SignatureError::UnknownTypeCode('z')
        );
        assert_eq!(
            parse_type(")").unwrap_err(),
            SignatureError::UnknownTypeCode(')')
        );
        assert_eq!(
            parse_type("{sis}").unwrap_err(),
            SignatureError::ExpectedCloseBrace
        );
        // One child is not enough for a dict entry.
        assert!(parse_type("{s}").is_err());
        // Signatures are ASCII; anything else is an unknown code.
        assert!(parse_type("é").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "a".repeat(64) + "i";
        assert!(parse_type(&deep).is_ok());
        let too_deep = "a".repeat(65) + "i";
        assert_eq!(
            parse_type(&too_deep).unwrap_err(),
            SignatureError::NestingTooDeep
        );
    }
}
