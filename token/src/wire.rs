//! Big-endian field readers for the blob header and payload prologue.

use nom::{IResult, Parser};

use crate::error::Error;

pub(crate) type ParseResult<'a, T> = IResult<&'a [u8], T>;

pub(crate) fn u8_field(input: &[u8]) -> ParseResult<'_, u8> {
    nom::number::complete::be_u8(input)
}

pub(crate) fn u16_field(input: &[u8]) -> ParseResult<'_, u16> {
    nom::number::complete::be_u16(input)
}

/// A 1-byte length prefix followed by that many bytes.
pub(crate) fn tiny_data(input: &[u8]) -> ParseResult<'_, &[u8]> {
    nom::multi::length_data(u8_field).parse(input)
}

pub(crate) fn truncated<E>(what: &'static str) -> impl FnOnce(nom::Err<E>) -> Error {
    move |_| Error::Truncated(what)
}
