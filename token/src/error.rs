//! Error types for whole-blob parsing and serialization.

use fdeflate::DecompressionError;
use pkcs11::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Failure inside an object or attribute record
    #[error("object: {0}")]
    Object(#[from] pkcs11::Error),

    /// The buffer ended inside the named structure
    #[error("truncated {0}")]
    Truncated(&'static str),

    /// Compression type other than 0 (none) or 1 (zlib)
    #[error("unsupported compression type {0}")]
    UnsupportedCompression(u16),

    /// Declared object count above the configured maximum
    #[error("declared object count {0} out of range")]
    ObjectCountOutOfRange(u16),

    /// Object table offset points past the end of the payload
    #[error("object table offset {0} outside the payload")]
    TableOffsetOutOfRange(u16),

    /// The compressed object data is not a valid zlib stream
    #[error("inflate: {0:?}")]
    Inflate(DecompressionError),

    /// The inflated object data is larger than the configured maximum
    #[error("inflated object data exceeds {0} bytes")]
    InflatedTooLarge(usize),

    /// Object data longer than the 2-byte data size field allows
    #[error("object data of {0} bytes does not fit the data size field")]
    PayloadTooLarge(usize),

    /// Token name longer than the 1-byte length field allows
    #[error("token name of {0} bytes does not fit the length field")]
    TokenNameTooLong(usize),

    /// More objects than the 2-byte count field allows
    #[error("{0} objects do not fit the object count field")]
    TooManyObjects(usize),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Object(e) => e.kind(),
            Error::UnsupportedCompression(_)
            | Error::PayloadTooLarge(_)
            | Error::TokenNameTooLong(_)
            | Error::TooManyObjects(_) => ErrorKind::Format,
            Error::Truncated(_)
            | Error::ObjectCountOutOfRange(_)
            | Error::TableOffsetOutOfRange(_)
            | Error::Inflate(_)
            | Error::InflatedTooLarge(_) => ErrorKind::CorruptBlob,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
