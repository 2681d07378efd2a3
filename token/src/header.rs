//! The fixed 20-byte header in front of the object data.

use nom::Parser;

use crate::error::{Error, Result};
use crate::wire::{ParseResult, truncated, u16_field};

/*
Header

  formatVersion     2 bytes
  objectVersion     2 bytes
  cuid             10 bytes
  compressionType   2 bytes: 0 none, 1 zlib
  dataSize          2 bytes
  dataOffset        2 bytes, position of the object data in the buffer

all big endian.
*/

pub const HEADER_LEN: usize = 20;
pub const CUID_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Zlib,
}

impl TryFrom<u16> for Compression {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Zlib),
            _ => Err(Error::UnsupportedCompression(value)),
        }
    }
}

impl From<Compression> for u16 {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::None => 0,
            Compression::Zlib => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) format_version: u16,
    pub(crate) object_version: u16,
    pub(crate) cuid: [u8; CUID_LEN],
    pub(crate) compression: Compression,
    pub(crate) data_size: u16,
    pub(crate) data_offset: u16,
}

type RawHeader<'a> = (u16, u16, &'a [u8], u16, u16, u16);

impl Header {
    pub(crate) fn parse(buf: &[u8], offset: usize) -> Result<Header> {
        let input = buf.get(offset..).ok_or(Error::Truncated("header"))?;
        let (_, (format_version, object_version, cuid, compression, data_size, data_offset)) =
            raw_header(input).map_err(truncated("header"))?;

        let mut cuid_bytes = [0u8; CUID_LEN];
        cuid_bytes.copy_from_slice(cuid);

        Ok(Header {
            format_version,
            object_version,
            cuid: cuid_bytes,
            compression: Compression::try_from(compression)?,
            data_size,
            data_offset,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.format_version.to_be_bytes());
        out.extend_from_slice(&self.object_version.to_be_bytes());
        out.extend_from_slice(&self.cuid);
        out.extend_from_slice(&u16::from(self.compression).to_be_bytes());
        out.extend_from_slice(&self.data_size.to_be_bytes());
        out.extend_from_slice(&self.data_offset.to_be_bytes());
    }
}

fn cuid_field(input: &[u8]) -> ParseResult<'_, &[u8]> {
    nom::bytes::complete::take(CUID_LEN).parse(input)
}

fn raw_header(input: &[u8]) -> ParseResult<'_, RawHeader<'_>> {
    (
        u16_field, u16_field, cuid_field, u16_field, u16_field, u16_field,
    )
        .parse(input)
}
