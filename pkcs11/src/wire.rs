//! Big-endian field readers shared by the record parsers.

use nom::{IResult, Parser};

use crate::error::Error;

pub(crate) type ParseResult<'a, T> = IResult<&'a [u8], T>;

pub(crate) fn u8_field(input: &[u8]) -> ParseResult<'_, u8> {
    nom::number::complete::be_u8(input)
}

pub(crate) fn u16_field(input: &[u8]) -> ParseResult<'_, u16> {
    nom::number::complete::be_u16(input)
}

pub(crate) fn u32_field(input: &[u8]) -> ParseResult<'_, u32> {
    nom::number::complete::be_u32(input)
}

/// A 2-byte length prefix followed by that many bytes.
pub(crate) fn short_data(input: &[u8]) -> ParseResult<'_, &[u8]> {
    nom::multi::length_data(u16_field).parse(input)
}

/// Maps any nom failure to [`Error::Truncated`]. Every parser here works on
/// complete input, so the only way to fail is running out of bytes.
pub(crate) fn truncated<E>(what: &'static str) -> impl FnOnce(nom::Err<E>) -> Error {
    move |_| Error::Truncated(what)
}

/// Returns `buf[offset..]`, or a truncation error naming `what`.
pub(crate) fn tail<'a>(buf: &'a [u8], offset: usize, what: &'static str) -> Result<&'a [u8], Error> {
    buf.get(offset..).ok_or(Error::Truncated(what))
}
