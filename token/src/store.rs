//! The per-token object directory.
//!
//! On the wire a certificate lives inside its 'c' attribute container as a
//! CKA_VALUE attribute. In memory the DER bytes are split out into a separate
//! 'C' object; [`TokenObjectStore::parse`] performs the split and the encoders
//! rejoin the two, emitting each certificate followed by its public and
//! private key.

use std::borrow::Cow;

use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use nom::Parser;
use pkcs11::constants::CKA_VALUE;
use pkcs11::{
    AttributeValue, Diagnostic, Diagnostics, ObjectClass, ObjectId, ObjectSpec, ObjectType,
    TracingDiagnostics,
};

use crate::compression::{deflate, inflate};
use crate::error::{Error, Result};
use crate::header::{CUID_LEN, Compression, HEADER_LEN, Header};
use crate::limits::Limits;
use crate::wire::{ParseResult, tiny_data, truncated, u16_field};

/*
Object data (after inflation)

  objectTableOffset   2 bytes
  declaredObjectCount 2 bytes
  tokenNameLength     1 byte
  tokenName           tokenNameLength bytes
  object table        at objectTableOffset, declaredObjectCount entries
*/

pub const PAYLOAD_PROLOGUE_LEN: usize = 5;

/// Number of certificate slots searched by [`TokenObjectStore::next_free_cert_index`].
pub const CERT_INDEX_SLOTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenObjectStore {
    format_version: u16,
    object_version: u16,
    cuid: [u8; CUID_LEN],
    token_name: Vec<u8>,
    objects: Vec<ObjectSpec>,
}

impl TokenObjectStore {
    /// An empty directory, as written when a blank token is formatted.
    pub fn new(
        format_version: u16,
        object_version: u16,
        cuid: [u8; CUID_LEN],
        token_name: impl Into<Vec<u8>>,
    ) -> Self {
        TokenObjectStore {
            format_version,
            object_version,
            cuid,
            token_name: token_name.into(),
            objects: Vec::new(),
        }
    }

    pub fn format_version(&self) -> u16 {
        self.format_version
    }

    pub fn object_version(&self) -> u16 {
        self.object_version
    }

    pub fn set_object_version(&mut self, object_version: u16) {
        self.object_version = object_version;
    }

    pub fn cuid(&self) -> &[u8; CUID_LEN] {
        &self.cuid
    }

    pub fn token_name(&self) -> &[u8] {
        &self.token_name
    }

    pub fn set_token_name(&mut self, token_name: impl Into<Vec<u8>>) {
        self.token_name = token_name.into();
    }

    pub fn objects(&self) -> &[ObjectSpec] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, object_id: ObjectId) -> Option<&ObjectSpec> {
        self.objects.iter().find(|o| o.object_id() == object_id)
    }

    /// Stores `spec`. An object with the same id is replaced in place and
    /// returned.
    pub fn add_object(&mut self, spec: ObjectSpec) -> Option<ObjectSpec> {
        match self
            .objects
            .iter_mut()
            .find(|o| o.object_id() == spec.object_id())
        {
            Some(existing) => Some(std::mem::replace(existing, spec)),
            None => {
                self.objects.push(spec);
                None
            }
        }
    }

    pub fn remove_object(&mut self, object_id: ObjectId) -> Option<ObjectSpec> {
        let position = self
            .objects
            .iter()
            .position(|o| o.object_id() == object_id)?;
        Some(self.objects.remove(position))
    }

    pub fn remove_all_objects(&mut self) {
        self.objects.clear();
    }

    fn certificate_object(&self, container: u32) -> Option<&ObjectSpec> {
        self.objects.iter().find(|o| {
            o.object_type() == Some(ObjectType::Certificate) && o.container_index() == container
        })
    }

    /// DER bytes of the certificate stored for `container`.
    pub fn certificate(&self, container: u32) -> Option<Cow<'_, [u8]>> {
        self.certificate_object(container)
            .and_then(|o| o.attribute(CKA_VALUE))
            .map(|a| match a.value() {
                AttributeValue::String(bytes) => Cow::Borrowed(bytes.as_slice()),
                other => Cow::Owned(other.data()),
            })
    }

    /// Whether any stored object has the human-readable id `attr_id`, e.g. "C1".
    pub fn does_cert_id_exist(&self, attr_id: &str) -> bool {
        self.objects.iter().any(|o| o.attr_id() == attr_id)
    }

    /// Lowest certificate container index in 0..100 not taken by a 'C' object.
    pub fn next_free_cert_index(&self) -> Option<u32> {
        let mut used = [false; CERT_INDEX_SLOTS];
        for spec in &self.objects {
            if spec.object_type() != Some(ObjectType::Certificate) {
                continue;
            }
            if let Some(slot) = used.get_mut(spec.container_index() as usize) {
                *slot = true;
            }
        }
        used.iter().position(|u| !u).map(|i| i as u32)
    }

    /// Parses the blob whose header starts at `raw[offset..]`.
    ///
    /// # Errors
    ///
    /// Any structural problem aborts the whole parse: an unsupported
    /// compression type, a declared object count above `limits.max_objects`,
    /// a truncated header, payload or object, an undecodable zlib stream,
    /// an unknown attribute type tag. A 'c' object carrying `CKA_VALUE` under
    /// an index outside 0..=61 fails with `InvalidObjectId`, since its
    /// certificate has no 'C' id to go to. Objects of unknown type are skipped
    /// and reported to `diagnostics`, as are bytes left after the declared
    /// number of objects.
    pub fn parse(
        raw: &[u8],
        offset: usize,
        limits: &Limits,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Self> {
        let header = Header::parse(raw, offset)?;

        let start = usize::from(header.data_offset);
        let data = raw
            .get(start..start + usize::from(header.data_size))
            .ok_or(Error::Truncated("object data"))?;
        let payload: Cow<'_, [u8]> = match header.compression {
            Compression::None => Cow::Borrowed(data),
            Compression::Zlib => Cow::Owned(inflate(data, limits.max_inflated_size)?),
        };

        let (_, (table_offset, declared, token_name)) =
            prologue(&payload).map_err(truncated("object data prologue"))?;
        if declared > limits.max_objects {
            return Err(Error::ObjectCountOutOfRange(declared));
        }
        let mut cursor = usize::from(table_offset);
        if cursor > payload.len() {
            return Err(Error::TableOffsetOutOfRange(table_offset));
        }

        let mut store = TokenObjectStore {
            format_version: header.format_version,
            object_version: header.object_version,
            cuid: header.cuid,
            token_name: token_name.to_vec(),
            objects: Vec::with_capacity(usize::from(declared)),
        };

        for found in 0..declared {
            if cursor == payload.len() {
                diagnostics.report(Diagnostic::MissingObjects { declared, found });
                break;
            }
            let (spec, consumed) = ObjectSpec::parse(&payload, cursor)?;
            cursor += consumed;
            store.absorb(spec, diagnostics)?;
        }
        if cursor < payload.len() {
            diagnostics.report(Diagnostic::TrailingBytes {
                count: payload.len() - cursor,
            });
        }

        Ok(store)
    }

    /// Files a freshly parsed table entry, splitting the certificate out of
    /// 'c' objects into a 'C' object.
    fn absorb(&mut self, mut spec: ObjectSpec, diagnostics: &mut dyn Diagnostics) -> Result<()> {
        match spec.object_type() {
            None => diagnostics.report(Diagnostic::SkippedObject {
                object_id: spec.object_id(),
            }),
            Some(ObjectType::CertificateAttributes) => {
                let certificate = match spec.remove_attribute(CKA_VALUE) {
                    Some(value) => {
                        let id = ObjectId::new('C', spec.container_index())?;
                        Some(ObjectSpec::from_certificate(id, &value.data()))
                    }
                    None => None,
                };
                self.insert(spec, diagnostics);
                if let Some(certificate) = certificate {
                    self.insert(certificate, diagnostics);
                }
            }
            Some(ObjectType::Key | ObjectType::Certificate) => self.insert(spec, diagnostics),
        }
        Ok(())
    }

    fn insert(&mut self, spec: ObjectSpec, diagnostics: &mut dyn Diagnostics) {
        let object_id = spec.object_id();
        if self.add_object(spec).is_some() {
            diagnostics.report(Diagnostic::ReplacedObject { object_id });
        }
    }

    /// Uncompressed blob: header with compression type 0, then the object data.
    pub fn get_data(&self) -> Result<Vec<u8>> {
        let payload = self.payload()?;
        self.blob(Compression::None, &payload)
    }

    /// zlib-compressed blob: header with compression type 1, then the
    /// deflated object data.
    pub fn get_compressed_data(&self) -> Result<Vec<u8>> {
        let payload = self.payload()?;
        self.blob(Compression::Zlib, &deflate(&payload))
    }

    fn blob(&self, compression: Compression, data: &[u8]) -> Result<Vec<u8>> {
        let header = Header {
            format_version: self.format_version,
            object_version: self.object_version,
            cuid: self.cuid,
            compression,
            data_size: u16::try_from(data.len()).map_err(|_| Error::PayloadTooLarge(data.len()))?,
            data_offset: HEADER_LEN as u16,
        };
        let mut out = Vec::with_capacity(HEADER_LEN + data.len());
        header.write_to(&mut out);
        out.extend_from_slice(data);
        Ok(out)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let name_len = u8::try_from(self.token_name.len())
            .map_err(|_| Error::TokenNameTooLong(self.token_name.len()))?;
        let total = self.objects.len();
        // Deployed applets expect the count written this way.
        let declared = u16::try_from(total - total / 4).map_err(|_| Error::TooManyObjects(total))?;
        let table_offset = u16::from(name_len) + PAYLOAD_PROLOGUE_LEN as u16;

        let mut out = Vec::new();
        out.extend_from_slice(&table_offset.to_be_bytes());
        out.extend_from_slice(&declared.to_be_bytes());
        out.push(name_len);
        out.extend_from_slice(&self.token_name);
        self.write_table(&mut out)?;
        Ok(out)
    }

    /// Writes each certificate container followed by the public and the
    /// private key of the same container. Objects outside such a group are
    /// not written.
    fn write_table(&self, out: &mut Vec<u8>) -> Result<()> {
        let certificates = self.objects.iter().filter(|o| {
            o.object_type() == Some(ObjectType::CertificateAttributes)
                && o.object_class() == ObjectClass::Certificate
        });
        for spec in certificates {
            let container = spec.container_index();

            let mut joined = spec.clone();
            if let Some(value) = self
                .certificate_object(container)
                .and_then(|c| c.attribute(CKA_VALUE))
            {
                joined.add_attribute(value.clone());
            }
            joined.write_to(out)?;

            for class in [ObjectClass::PublicKey, ObjectClass::PrivateKey] {
                for key in self.objects.iter().filter(|o| {
                    o.object_type() == Some(ObjectType::Key)
                        && o.object_class() == class
                        && o.container_index() == container
                }) {
                    key.write_to(out)?;
                }
            }
        }
        Ok(())
    }
}

fn prologue(input: &[u8]) -> ParseResult<'_, (u16, u16, &[u8])> {
    (u16_field, u16_field, tiny_data).parse(input)
}

impl DecodableFrom<&[u8]> for TokenObjectStore {}

impl Decoder<&[u8], TokenObjectStore> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<TokenObjectStore> {
        TokenObjectStore::parse(self, 0, &Limits::default(), &mut TracingDiagnostics)
    }
}

impl EncodableTo<TokenObjectStore> for Vec<u8> {}

impl Encoder<TokenObjectStore, Vec<u8>> for TokenObjectStore {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        self.get_compressed_data()
    }
}
