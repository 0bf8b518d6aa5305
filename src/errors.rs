use std::result::Result as StdResult;

use thiserror::Error as ThisError;

pub type Result<T> = StdResult<T, Error>;

/// Error codes mirrored from the external calling surface (spec.md §6).
///
/// Several variants (the textual-parse family) have no producer in this
/// crate: the fingerprint-stream parser is an external collaborator, but
/// a host binding sharing this type still needs the codes to surface
/// whatever the parser reports.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum Error {
    /// A parameter passed to this function was invalid.
    #[error("a parameter passed to this function was invalid: {0}")]
    BadArg(String),

    /// A memory allocation failed while growing a result row.
    #[error("memory allocation failed while growing a result row")]
    NoMemory,

    /// The input line uses a whitespace form this crate doesn't accept.
    #[error("line uses unsupported whitespace")]
    UnsupportedWhitespace,

    /// The record is missing its fingerprint field.
    #[error("record is missing a fingerprint field")]
    MissingFingerprint,

    /// The fingerprint field could not be decoded.
    #[error("fingerprint field could not be decoded")]
    BadFingerprint,

    /// The fingerprint's length does not match the declared bit width.
    #[error("fingerprint length does not match the declared bit width")]
    UnexpectedFingerprintLength,

    /// The record is missing its identifier field.
    #[error("record is missing an identifier field")]
    MissingId,

    /// The identifier field could not be decoded.
    #[error("identifier field could not be decoded")]
    BadId,

    /// The record is missing its terminating newline.
    #[error("record is missing a terminating newline")]
    MissingNewline,

    /// The requested kernel does not support this alignment/stride combination.
    #[error("requested kernel does not support this alignment/stride combination")]
    MethodMismatch,

    /// The reorder ordering name is not one of the known tokens.
    #[error("unknown reorder ordering name: {0}")]
    UnknownOrdering(String),
}

impl Error {
    /// Numeric code matching spec.md §6's error-code enumeration.
    pub fn code(&self) -> i32 {
        match self {
            Error::BadArg(_) => 1,
            Error::NoMemory => 2,
            Error::UnsupportedWhitespace => 3,
            Error::MissingFingerprint => 4,
            Error::BadFingerprint => 5,
            Error::UnexpectedFingerprintLength => 6,
            Error::MissingId => 7,
            Error::BadId => 8,
            Error::MissingNewline => 9,
            Error::MethodMismatch => 10,
            Error::UnknownOrdering(_) => 11,
        }
    }
}

macro_rules! bad_arg {
    ($($arg:tt)*) => {
        return Err($crate::errors::Error::BadArg(format!($($arg)*)))
    };
}

pub(crate) use bad_arg;
