use std::{error, fmt};

use crate::signature::SignatureError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The signature string is malformed or has trailing characters.
    Signature(SignatureError),
    /// A frame grew past what a 4-byte framing offset can address.
    OffsetOutOfRange(usize),
    /// The value's shape does not match the signature on serialize.
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Signature(err) => err.fmt(f),
            Error::OffsetOutOfRange(len) => {
                write!(f, "frame of {} bytes exceeds 4-byte framing offsets", len)
            }
            Error::TypeMismatch { expected, found } => {
                write!(f, "expected a value of type \"{}\", found {}", expected, found)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Signature(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Error {
        Error::Signature(err)
    }
}
