//! Object id codec.
//!
//! A token object is addressed by a 4-byte id. The top byte is an ASCII type
//! character, the next byte an index character from the base-62 alphabet
//! `0-9A-Za-z`. The low 16 bits are reserved and written as zero.
//!
//! Human-readable ids ("attribute ids") print the type character followed by
//! the decimal index, for example `c3` or `k17`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const MAX_INDEX: u32 = 61;

/// Index characters outside the base-62 alphabet decode into this band.
pub const RESERVED_INDEX_BASE: u32 = 0x100;

/// Object type character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// 'c': attribute container of a certificate
    CertificateAttributes,
    /// 'k': attribute container of a public or private key
    Key,
    /// 'C': raw DER certificate
    Certificate,
}

impl ObjectType {
    pub const fn type_char(self) -> char {
        match self {
            ObjectType::CertificateAttributes => 'c',
            ObjectType::Key => 'k',
            ObjectType::Certificate => 'C',
        }
    }
}

impl TryFrom<char> for ObjectType {
    type Error = char;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        match c {
            'c' => Ok(ObjectType::CertificateAttributes),
            'k' => Ok(ObjectType::Key),
            'C' => Ok(ObjectType::Certificate),
            other => Err(other),
        }
    }
}

/// Decodes an index character: digits to 0..=9, 'A'..='Z' to 10..=35,
/// 'a'..='z' to 36..=61, anything else to `RESERVED_INDEX_BASE + c`.
pub const fn decode_index_char(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'A'..=b'Z' => (c - b'A') as u32 + 10,
        b'a'..=b'z' => (c - b'a') as u32 + 36,
        _ => RESERVED_INDEX_BASE + c as u32,
    }
}

/// Inverse of [`decode_index_char`] over 0..=61.
pub const fn index_char(index: u32) -> Option<u8> {
    match index {
        0..=9 => Some(b'0' + index as u8),
        10..=35 => Some(b'A' + (index - 10) as u8),
        36..=61 => Some(b'a' + (index - 36) as u8),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Packs `(type_char << 24) | (index_char << 16)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidObjectId`] if `type_char` is not one of `c`, `C`, `k`
    /// or `index` is outside 0..=61.
    pub fn new(type_char: char, index: u32) -> Result<Self> {
        let invalid = || Error::InvalidObjectId { type_char, index };
        ObjectType::try_from(type_char).map_err(|_| invalid())?;
        let c = index_char(index).ok_or_else(invalid)?;
        Ok(ObjectId(((type_char as u32) << 24) | (u32::from(c) << 16)))
    }

    pub const fn from_raw(raw: u32) -> Self {
        ObjectId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn type_char(self) -> char {
        (self.0 >> 24) as u8 as char
    }

    pub fn object_type(self) -> Option<ObjectType> {
        ObjectType::try_from(self.type_char()).ok()
    }

    /// The index character of byte 2, decoded.
    pub const fn index(self) -> u32 {
        decode_index_char((self.0 >> 16) as u8)
    }

    /// Container the object belongs to.
    ///
    /// Key objects are declared at twice their certificate's container index,
    /// plus one for the sibling key, so `n` and `n + 1` for even `n` both fold
    /// to `n / 2`. Other objects declare the container index directly.
    pub fn container_index(self) -> u32 {
        let declared = self.index();
        match self.object_type() {
            Some(ObjectType::Key) if declared % 2 == 0 => declared / 2,
            Some(ObjectType::Key) => (declared - 1) / 2,
            _ => declared,
        }
    }

    /// Same index, different type character.
    pub fn with_type(self, object_type: ObjectType) -> Self {
        ObjectId((self.0 & 0x00ff_ffff) | ((object_type.type_char() as u32) << 24))
    }

    /// Type character followed by the decimal declared index, e.g. `k3`.
    /// Store lookups by id string use [`ObjectSpec::attr_id`] instead, which
    /// folds keys to their container.
    ///
    /// [`ObjectSpec::attr_id`]: crate::ObjectSpec::attr_id
    pub fn declared_id(self) -> String {
        self.to_string()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.type_char(), self.index())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let type_char = chars.next().ok_or_else(|| Error::InvalidAttrId(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAttrId(s.to_string()));
        }
        let index = digits
            .parse::<u32>()
            .map_err(|_| Error::InvalidAttrId(s.to_string()))?;
        ObjectId::new(type_char, index)
    }
}

impl From<ObjectId> for u32 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}
