//! zlib wrapping of the object data.

use fdeflate::BoundedDecompressionError;

use crate::error::{Error, Result};

pub(crate) fn deflate(data: &[u8]) -> Vec<u8> {
    fdeflate::compress_to_vec(data)
}

/// Inflates `data`, refusing to produce more than `max_len` bytes.
pub(crate) fn inflate(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    fdeflate::decompress_to_vec_bounded(data, max_len).map_err(|e| match e {
        BoundedDecompressionError::DecompressionError { inner } => Error::Inflate(inner),
        BoundedDecompressionError::OutputTooLarge { .. } => Error::InflatedTooLarge(max_len),
    })
}
