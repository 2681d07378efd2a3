//! Token objects: certificate attribute containers ('c'), key attribute
//! containers ('k') and raw DER certificates ('C').
//!
//! An object reaches this type in one of two shapes:
//!
//! * as an entry of the flat object table inside the token blob, read by
//!   [`ObjectSpec::parse`] and written by [`ObjectSpec::write_to`];
//! * as the per-object data a card applet returns, read by
//!   [`ObjectSpec::from_token_data`]. Its attribute stream is classified into
//!   the fixed-attribute word plus a short list of retained attributes.

use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use nom::Parser;

use crate::attribute::{self, AttributeSpec, AttributeValue};
use crate::constants::{Attribute, CKA_VALUE, ObjectClass, Role};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::fixed::{FixedAttributes, FixedFlag};
use crate::object_id::{ObjectId, ObjectType};
use crate::wire::{ParseResult, short_data, tail, truncated, u16_field, u32_field};

/*
Object table entry

  objectId          4 bytes, big endian
  fixedAttributes   4 bytes, big endian
  attributeCount    2 bytes, big endian
  attributeCount x AttributeSpec

Card object data ('c' and 'k')

  preamble          7 bytes, card specific, ignored
  repeated until the end of the data:
    attributeId     4 bytes, big endian (CKA_*)
    length          2 bytes, big endian
    value           length bytes
*/

/// Card-specific bytes in front of the attribute stream of a card object.
pub const CARD_DATA_PREAMBLE_LEN: usize = 7;

const TABLE_HEADER_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSpec {
    object_id: ObjectId,
    fixed_attributes: FixedAttributes,
    attributes: Vec<AttributeSpec>,
}

impl ObjectSpec {
    pub fn new(object_id: ObjectId, fixed_attributes: FixedAttributes) -> Self {
        ObjectSpec {
            object_id,
            fixed_attributes,
            attributes: Vec::new(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn object_type(&self) -> Option<ObjectType> {
        self.object_id.object_type()
    }

    pub fn fixed_attributes(&self) -> FixedAttributes {
        self.fixed_attributes
    }

    pub fn set_fixed_attributes(&mut self, fixed_attributes: FixedAttributes) {
        self.fixed_attributes = fixed_attributes;
    }

    pub fn object_class(&self) -> ObjectClass {
        self.fixed_attributes.object_class()
    }

    pub fn container_index(&self) -> u32 {
        self.object_id.container_index()
    }

    /// Type character followed by the decimal container index, e.g. `k1` for
    /// a key declared at index 3. This is the form
    /// `TokenObjectStore::does_cert_id_exist` matches against;
    /// [`ObjectId::declared_id`] keeps the declared index.
    pub fn attr_id(&self) -> String {
        format!("{}{}", self.object_id.type_char(), self.container_index())
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn attribute(&self, attribute_id: u32) -> Option<&AttributeSpec> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id() == attribute_id)
    }

    /// Adds an attribute. An attribute with the same id is replaced in place
    /// and returned.
    pub fn add_attribute(&mut self, attribute: AttributeSpec) -> Option<AttributeSpec> {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.attribute_id() == attribute.attribute_id())
        {
            Some(existing) => Some(std::mem::replace(existing, attribute)),
            None => {
                self.attributes.push(attribute);
                None
            }
        }
    }

    pub fn remove_attribute(&mut self, attribute_id: u32) -> Option<AttributeSpec> {
        let position = self
            .attributes
            .iter()
            .position(|a| a.attribute_id() == attribute_id)?;
        Some(self.attributes.remove(position))
    }

    /// Builds a 'C' object holding `der` as its only attribute, CKA_VALUE.
    pub fn from_certificate(object_id: ObjectId, der: &[u8]) -> Self {
        let mut fixed = FixedAttributes::default().with(FixedFlag::Token);
        fixed.set_object_class(ObjectClass::Certificate);
        fixed.set_container(object_id.index());
        ObjectSpec {
            object_id,
            fixed_attributes: fixed,
            attributes: vec![AttributeSpec::new(
                CKA_VALUE,
                AttributeValue::String(der.to_vec()),
            )],
        }
    }

    /// Builds an object from the data a card applet returns for `object_id`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownObjectType`] for ids outside c, k and C, and
    /// [`Error::Truncated`] or [`Error::InvalidIntegerLength`] for malformed
    /// attribute streams. Unknown attribute ids are reported to `diagnostics`
    /// and skipped.
    pub fn from_token_data(
        object_id: ObjectId,
        data: &[u8],
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Self> {
        match object_id.object_type() {
            Some(ObjectType::CertificateAttributes | ObjectType::Key) => {
                Self::parse_attributes(object_id, data, diagnostics)
            }
            Some(ObjectType::Certificate) => Ok(Self::from_certificate(object_id, data)),
            None => Err(Error::UnknownObjectType(object_id.type_char())),
        }
    }

    fn parse_attributes(
        object_id: ObjectId,
        data: &[u8],
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Self> {
        let mut input = tail(data, CARD_DATA_PREAMBLE_LEN, "card object preamble")?;
        let mut fixed = FixedAttributes::default();
        let mut class = ObjectClass::Data;
        let mut attributes = Vec::new();

        while !input.is_empty() {
            let (rest, (attribute_id, value)) =
                card_entry(input).map_err(truncated("card attribute"))?;
            input = rest;

            let Some(attribute) = Attribute::from_id(attribute_id) else {
                diagnostics.report(Diagnostic::UnknownAttribute {
                    object_id,
                    attribute_id,
                    length: value.len(),
                });
                continue;
            };

            match attribute.role() {
                Role::Flag(flag) => {
                    if value.first().is_some_and(|b| *b != 0) {
                        fixed.insert(flag);
                    }
                }
                Role::Class => class = ObjectClass::from(card_integer(attribute_id, value)?),
                Role::RetainString => attributes.push(AttributeSpec::new(
                    attribute_id,
                    AttributeValue::String(value.to_vec()),
                )),
                Role::RetainInteger => attributes.push(AttributeSpec::new(
                    attribute_id,
                    AttributeValue::Integer(card_integer(attribute_id, value)?),
                )),
                Role::Skip => {}
            }
        }

        fixed.set_object_class(class);
        fixed.set_container(object_id.container_index());

        Ok(ObjectSpec {
            object_id,
            fixed_attributes: fixed,
            attributes,
        })
    }

    /// Parses one object table entry at `buf[offset..]`, returning it and the
    /// bytes consumed.
    ///
    /// Attributes are kept verbatim and in wire order. The container bits of
    /// the fixed attributes are rewritten from the object id.
    pub fn parse(buf: &[u8], offset: usize) -> Result<(ObjectSpec, usize)> {
        let input = tail(buf, offset, "object")?;
        let (rest, spec) = Self::parser(input)?;
        Ok((spec, input.len() - rest.len()))
    }

    fn parser(input: &[u8]) -> Result<(&[u8], ObjectSpec)> {
        let (mut input, (raw_id, fixed, count)) =
            table_header(input).map_err(truncated("object header"))?;

        // A hostile count must not drive the allocation.
        let capacity = usize::from(count).min(input.len() / attribute::MIN_ENCODED_LEN);
        let mut attributes = Vec::with_capacity(capacity);
        for _ in 0..count {
            let (rest, attribute) = AttributeSpec::parser(input)?;
            attributes.push(attribute);
            input = rest;
        }

        let object_id = ObjectId::from_raw(raw_id);
        let mut fixed_attributes = FixedAttributes::from_bits(fixed);
        fixed_attributes.set_container(object_id.container_index());

        Ok((
            input,
            ObjectSpec {
                object_id,
                fixed_attributes,
                attributes,
            },
        ))
    }

    pub fn encoded_len(&self) -> usize {
        TABLE_HEADER_LEN
            + self
                .attributes
                .iter()
                .map(AttributeSpec::encoded_len)
                .sum::<usize>()
    }

    /// Appends the object table entry to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let count = u16::try_from(self.attributes.len())
            .map_err(|_| Error::TooManyAttributes(self.attributes.len()))?;
        out.extend_from_slice(&self.object_id.raw().to_be_bytes());
        out.extend_from_slice(&self.fixed_attributes.bits().to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        for attribute in &self.attributes {
            attribute.write_to(out)?;
        }
        Ok(())
    }
}

fn table_header(input: &[u8]) -> ParseResult<'_, (u32, u32, u16)> {
    (u32_field, u32_field, u16_field).parse(input)
}

fn card_entry(input: &[u8]) -> ParseResult<'_, (u32, &[u8])> {
    (u32_field, short_data).parse(input)
}

fn card_integer(attribute_id: u32, value: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = value.try_into().map_err(|_| Error::InvalidIntegerLength {
        attribute_id,
        length: value.len(),
    })?;
    Ok(u32::from_be_bytes(bytes))
}

impl DecodableFrom<&[u8]> for ObjectSpec {}

impl Decoder<&[u8], ObjectSpec> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<ObjectSpec> {
        ObjectSpec::parse(self, 0).map(|(spec, _)| spec)
    }
}

impl EncodableTo<ObjectSpec> for Vec<u8> {}

impl Encoder<ObjectSpec, Vec<u8>> for ObjectSpec {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::constants::{
        CKA_CLASS, CKA_DECRYPT, CKA_EC_POINT, CKA_ID, CKA_KEY_TYPE, CKA_LABEL, CKA_MODULUS,
        CKA_PRIVATE, CKA_SIGN, CKA_TOKEN, CKK_RSA, CKO_PRIVATE_KEY, CKO_PUBLIC_KEY,
    };

    struct CardData(Vec<u8>);

    impl CardData {
        fn new() -> Self {
            CardData(vec![0xa5; CARD_DATA_PREAMBLE_LEN])
        }

        fn entry(mut self, attribute_id: u32, value: &[u8]) -> Self {
            self.0.extend_from_slice(&attribute_id.to_be_bytes());
            self.0.extend_from_slice(&(value.len() as u16).to_be_bytes());
            self.0.extend_from_slice(value);
            self
        }
    }

    fn id(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    #[test]
    fn test_only_private_flag_set() {
        let data = CardData::new()
            .entry(CKA_TOKEN, &[0x00])
            .entry(CKA_PRIVATE, &[0x01])
            .entry(CKA_SIGN, &[0x00])
            .entry(CKA_DECRYPT, &[])
            .0;
        let spec = ObjectSpec::from_token_data(id("c0"), &data, &mut ()).unwrap();
        assert_eq!(spec.fixed_attributes().bits(), FixedFlag::Private.bit());
        assert!(spec.attributes().is_empty());
    }

    #[test]
    fn test_classification() {
        let data = CardData::new()
            .entry(CKA_CLASS, &CKO_PRIVATE_KEY.to_be_bytes())
            .entry(CKA_TOKEN, &[0x01])
            .entry(CKA_SIGN, &[0x01])
            .entry(CKA_LABEL, b"mykey")
            .entry(CKA_KEY_TYPE, &CKK_RSA.to_be_bytes())
            .entry(CKA_MODULUS, &[0xc0, 0xff, 0xee])
            .entry(CKA_ID, &[0x01, 0x02])
            .entry(CKA_EC_POINT, &[0x04, 0x01])
            .0;
        let spec = ObjectSpec::from_token_data(id("k5"), &data, &mut ()).unwrap();

        let fixed = spec.fixed_attributes();
        assert_eq!(fixed.object_class(), ObjectClass::PrivateKey);
        assert_eq!(fixed.container(), 2);
        assert_eq!(
            fixed.flags().collect::<Vec<_>>(),
            vec![FixedFlag::Token, FixedFlag::Sign]
        );
        assert_eq!(
            spec.attributes(),
            &[
                AttributeSpec::new(CKA_LABEL, AttributeValue::String(b"mykey".to_vec())),
                AttributeSpec::new(CKA_KEY_TYPE, AttributeValue::Integer(CKK_RSA)),
                AttributeSpec::new(CKA_EC_POINT, AttributeValue::String(vec![0x04, 0x01])),
            ]
        );
        assert_eq!(spec.attr_id(), "k2");
        assert_eq!(spec.object_id().declared_id(), "k5");
    }

    #[rstest(object_id, expected,
        case("c2", 2),
        case("k4", 2),
        case("k5", 2),
        case("k0", 0),
        case("kF", 7),
    )]
    fn test_container_folding(object_id: &str, expected: u8) {
        let data = CardData::new()
            .entry(CKA_CLASS, &CKO_PUBLIC_KEY.to_be_bytes())
            .0;
        let spec = ObjectSpec::from_token_data(id(object_id), &data, &mut ()).unwrap();
        assert_eq!(spec.fixed_attributes().container(), expected);
        assert_eq!(spec.container_index(), u32::from(expected));
    }

    #[test]
    fn test_unknown_attribute_is_skipped_and_reported() {
        let data = CardData::new()
            .entry(0x8000_0001, &[0xde, 0xad, 0xbe])
            .entry(CKA_LABEL, b"after")
            .0;
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let spec = ObjectSpec::from_token_data(id("c1"), &data, &mut diagnostics).unwrap();

        assert_eq!(spec.attributes().len(), 1);
        assert_eq!(spec.attributes()[0].attribute_id(), CKA_LABEL);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnknownAttribute {
                object_id: id("c1"),
                attribute_id: 0x8000_0001,
                length: 3,
            }]
        );
    }

    #[rstest(data,
        case(vec![0x00; 6]),
        case({ let mut d = vec![0x00; 7]; d.extend_from_slice(&[0x00, 0x00, 0x00]); d }),
        case({ let mut d = vec![0x00; 7]; d.extend_from_slice(&[0x00, 0x00, 0x00, 0x03, 0x00, 0x09, 0x41]); d }),
    )]
    fn test_card_data_truncated(data: Vec<u8>) {
        let result = ObjectSpec::from_token_data(id("c1"), &data, &mut ());
        assert!(matches!(result, Err(Error::Truncated(_))));
    }

    #[test]
    fn test_card_integer_length() {
        let data = CardData::new().entry(CKA_CLASS, &[0x00, 0x01]).0;
        assert_eq!(
            ObjectSpec::from_token_data(id("k1"), &data, &mut ()),
            Err(Error::InvalidIntegerLength {
                attribute_id: CKA_CLASS,
                length: 2
            })
        );
    }

    #[test]
    fn test_certificate_blob() {
        let der = [0x30, 0x03, 0x02, 0x01, 0x01];
        let spec = ObjectSpec::from_token_data(id("C3"), &der, &mut ()).unwrap();
        assert_eq!(spec.fixed_attributes().bits(), 0x80 | 0x10 | 0x03);
        assert_eq!(spec.object_class(), ObjectClass::Certificate);
        assert_eq!(
            spec.attribute(CKA_VALUE).map(|a| a.value().data()),
            Some(der.to_vec())
        );
    }

    #[test]
    fn test_from_token_data_unknown_type() {
        let result = ObjectSpec::from_token_data(ObjectId::from_raw(0x7a30_0000), &[], &mut ());
        assert_eq!(result, Err(Error::UnknownObjectType('z')));
    }

    #[test]
    fn test_table_entry_roundtrip() {
        let mut spec = ObjectSpec::new(
            id("k3"),
            FixedAttributes::default().with(FixedFlag::Private),
        );
        let mut fixed = spec.fixed_attributes();
        fixed.set_object_class(ObjectClass::PrivateKey);
        fixed.set_container(1);
        spec.set_fixed_attributes(fixed);
        spec.add_attribute(AttributeSpec::new(
            CKA_LABEL,
            AttributeValue::String(b"key".to_vec()),
        ));
        spec.add_attribute(AttributeSpec::new(CKA_KEY_TYPE, AttributeValue::Integer(0)));
        spec.add_attribute(AttributeSpec::new(CKA_TOKEN, AttributeValue::BoolTrue));

        let bytes: Vec<u8> = spec.encode().unwrap();
        assert_eq!(bytes.len(), spec.encoded_len());
        assert_eq!(&bytes[..10], &[0x6b, 0x33, 0x00, 0x00, 0x00, 0x00, 0x01, 0x31, 0x00, 0x03]);

        let mut padded = vec![0xee, 0xee];
        padded.extend_from_slice(&bytes);
        padded.push(0xee);
        let (parsed, consumed) = ObjectSpec::parse(&padded, 2).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_table_entry_container_from_id() {
        // fixed attributes claim container 9, the id says k5 -> container 2
        let bytes = [0x6b, 0x35, 0x00, 0x00, 0x00, 0x00, 0x00, 0xa9, 0x00, 0x00];
        let spec: ObjectSpec = bytes.as_slice().decode().unwrap();
        assert_eq!(spec.fixed_attributes().bits(), 0xa2);
        assert_eq!(spec.container_index(), 2);
    }

    #[rstest(bytes,
        case(vec![0x63, 0x31, 0x00, 0x00, 0x00]),
        case(vec![0x63, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x01]),
        case(vec![0x63, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0xff, 0x00, 0x00, 0x00, 0x01, 0x03]),
    )]
    fn test_table_entry_truncated(bytes: Vec<u8>) {
        assert!(matches!(
            ObjectSpec::parse(&bytes, 0),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn test_table_entry_unsupported_attribute_type() {
        let bytes = [
            0x63, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03,
            0x04,
        ];
        assert_eq!(
            ObjectSpec::parse(&bytes, 0),
            Err(Error::UnsupportedAttributeType(4))
        );
    }

    #[test]
    fn test_add_attribute_replaces_in_place() {
        let mut spec = ObjectSpec::new(id("c0"), FixedAttributes::default());
        spec.add_attribute(AttributeSpec::new(CKA_LABEL, AttributeValue::String(b"a".to_vec())));
        spec.add_attribute(AttributeSpec::new(CKA_TOKEN, AttributeValue::BoolTrue));
        let old = spec.add_attribute(AttributeSpec::new(
            CKA_LABEL,
            AttributeValue::String(b"b".to_vec()),
        ));

        assert_eq!(old.map(AttributeSpec::into_value), Some(AttributeValue::String(b"a".to_vec())));
        assert_eq!(spec.attributes()[0].value().data(), b"b".to_vec());
        assert_eq!(spec.attributes().len(), 2);

        assert!(spec.remove_attribute(CKA_TOKEN).is_some());
        assert!(spec.remove_attribute(CKA_TOKEN).is_none());
        assert_eq!(spec.attributes().len(), 1);
    }
}
