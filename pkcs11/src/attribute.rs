//! A single PKCS#11 attribute record of the object table.

use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use nom::Parser;

use crate::error::{Error, Result};
use crate::wire::{ParseResult, short_data, tail, truncated, u8_field, u32_field};

/*
AttributeSpec wire layout

  attributeId   4 bytes, big endian (CKA_*)
  type          1 byte: 0 String, 1 Integer, 2 BoolFalse, 3 BoolTrue
  String:       2-byte big-endian length N, then N bytes
  Integer:      4 bytes, big endian
  BoolFalse/BoolTrue carry no payload
*/

/// Smallest possible record: id and type tag of a boolean.
pub(crate) const MIN_ENCODED_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    String = 0,
    Integer = 1,
    BoolFalse = 2,
    BoolTrue = 3,
}

impl TryFrom<u8> for ValueType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(ValueType::String),
            1 => Ok(ValueType::Integer),
            2 => Ok(ValueType::BoolFalse),
            3 => Ok(ValueType::BoolTrue),
            _ => Err(Error::UnsupportedAttributeType(tag)),
        }
    }
}

impl From<ValueType> for u8 {
    fn from(value_type: ValueType) -> Self {
        value_type as u8
    }
}

/// Attribute payload. The variant fixes the payload length: a String holds
/// its bytes, an Integer always 4 bytes, booleans none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    String(Vec<u8>),
    Integer(u32),
    BoolFalse,
    BoolTrue,
}

impl AttributeValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::String(_) => ValueType::String,
            AttributeValue::Integer(_) => ValueType::Integer,
            AttributeValue::BoolFalse => ValueType::BoolFalse,
            AttributeValue::BoolTrue => ValueType::BoolTrue,
        }
    }

    /// Payload bytes as they appear after the type tag, without any length prefix.
    pub fn data(&self) -> Vec<u8> {
        match self {
            AttributeValue::String(bytes) => bytes.clone(),
            AttributeValue::Integer(v) => v.to_be_bytes().to_vec(),
            AttributeValue::BoolFalse | AttributeValue::BoolTrue => Vec::new(),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        if value {
            AttributeValue::BoolTrue
        } else {
            AttributeValue::BoolFalse
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSpec {
    attribute_id: u32,
    value: AttributeValue,
}

impl AttributeSpec {
    pub fn new(attribute_id: u32, value: AttributeValue) -> Self {
        AttributeSpec {
            attribute_id,
            value,
        }
    }

    pub fn attribute_id(&self) -> u32 {
        self.attribute_id
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Wire payload without the length prefix.
    pub fn data(&self) -> Vec<u8> {
        self.value.data()
    }

    pub fn into_value(self) -> AttributeValue {
        self.value
    }

    /// Parses one record at `buf[offset..]`, returning it and the bytes consumed.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedAttributeType`] for a type tag outside 0..=3,
    /// [`Error::Truncated`] if the buffer ends inside the record.
    pub fn parse(buf: &[u8], offset: usize) -> Result<(AttributeSpec, usize)> {
        let input = tail(buf, offset, "attribute")?;
        let (rest, spec) = Self::parser(input)?;
        Ok((spec, input.len() - rest.len()))
    }

    pub(crate) fn parser(input: &[u8]) -> Result<(&[u8], AttributeSpec)> {
        let (input, (attribute_id, tag)) = header(input).map_err(truncated("attribute header"))?;
        let (input, value) = match ValueType::try_from(tag)? {
            ValueType::String => {
                let (input, data) = short_data(input).map_err(truncated("string attribute"))?;
                (input, AttributeValue::String(data.to_vec()))
            }
            ValueType::Integer => {
                let (input, v) = u32_field(input).map_err(truncated("integer attribute"))?;
                (input, AttributeValue::Integer(v))
            }
            ValueType::BoolFalse => (input, AttributeValue::BoolFalse),
            ValueType::BoolTrue => (input, AttributeValue::BoolTrue),
        };
        Ok((
            input,
            AttributeSpec {
                attribute_id,
                value,
            },
        ))
    }

    pub fn encoded_len(&self) -> usize {
        MIN_ENCODED_LEN
            + match &self.value {
                AttributeValue::String(bytes) => 2 + bytes.len(),
                AttributeValue::Integer(_) => 4,
                AttributeValue::BoolFalse | AttributeValue::BoolTrue => 0,
            }
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.attribute_id.to_be_bytes());
        out.push(self.value_type().into());
        match &self.value {
            AttributeValue::String(bytes) => {
                let length = u16::try_from(bytes.len()).map_err(|_| Error::ValueTooLong {
                    attribute_id: self.attribute_id,
                    length: bytes.len(),
                })?;
                out.extend_from_slice(&length.to_be_bytes());
                out.extend_from_slice(bytes);
            }
            AttributeValue::Integer(v) => out.extend_from_slice(&v.to_be_bytes()),
            AttributeValue::BoolFalse | AttributeValue::BoolTrue => {}
        }
        Ok(())
    }
}

fn header(input: &[u8]) -> ParseResult<'_, (u32, u8)> {
    (u32_field, u8_field).parse(input)
}

impl DecodableFrom<&[u8]> for AttributeSpec {}

impl Decoder<&[u8], AttributeSpec> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<AttributeSpec> {
        AttributeSpec::parse(self, 0).map(|(spec, _)| spec)
    }
}

impl EncodableTo<AttributeSpec> for Vec<u8> {}

impl Encoder<AttributeSpec, Vec<u8>> for AttributeSpec {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}
