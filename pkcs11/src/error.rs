//! Error types for attribute and object records.

use thiserror::Error;

/// Errors that can occur while parsing or encoding attribute and object records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended inside the named structure
    #[error("truncated {0}")]
    Truncated(&'static str),

    /// A CK_ULONG attribute in card data was not 4 bytes long
    #[error("attribute 0x{attribute_id:08x}: integer value must be 4 bytes, got {length}")]
    InvalidIntegerLength { attribute_id: u32, length: usize },

    /// Type tag outside String(0), Integer(1), BoolFalse(2), BoolTrue(3)
    #[error("unsupported attribute type tag {0}")]
    UnsupportedAttributeType(u8),

    /// Object id with a type outside {c, C, k} or an index outside 0..=61
    #[error("invalid object id: type {type_char:?}, index {index}")]
    InvalidObjectId { type_char: char, index: u32 },

    /// A human-readable id such as "c3" that could not be parsed
    #[error("invalid attribute id {0:?}")]
    InvalidAttrId(String),

    /// Card data was supplied for an object type this codec does not model
    #[error("unknown object type {0:?}")]
    UnknownObjectType(char),

    /// String value longer than its 2-byte length prefix allows
    #[error("attribute 0x{attribute_id:08x}: value of {length} bytes does not fit the length field")]
    ValueTooLong { attribute_id: u32, length: usize },

    /// More attributes than the 2-byte attribute count allows
    #[error("object carries {0} attributes, more than the count field allows")]
    TooManyAttributes(usize),
}

/// The four failure classes callers act on.
///
/// All of them are fatal for the current parse or encode call. A structurally
/// bad blob does not become valid by retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inconsistent header or a value that cannot be represented on the wire
    Format,
    /// Counts outside sane bounds, truncated buffers, undecodable payloads
    CorruptBlob,
    /// Attribute type tag outside {0, 1, 2, 3}
    UnsupportedAttributeType,
    /// Object id that cannot be encoded or parsed
    InvalidObjectId,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Truncated(_) | Error::InvalidIntegerLength { .. } => ErrorKind::CorruptBlob,
            Error::UnsupportedAttributeType(_) => ErrorKind::UnsupportedAttributeType,
            Error::InvalidObjectId { .. } | Error::InvalidAttrId(_) | Error::UnknownObjectType(_) => {
                ErrorKind::InvalidObjectId
            }
            Error::ValueTooLong { .. } | Error::TooManyAttributes(_) => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
