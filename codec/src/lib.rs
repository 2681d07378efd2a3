//! # codec
//!
//! Core conversion traits for the token object directory codec.
//!
//! A smart card stores its PKCS#11 object directory as one binary blob. The
//! crates in this workspace convert between that blob and a structured model:
//!
//! ```text
//! &[u8] → TokenObjectStore → ObjectSpec → AttributeSpec
//! ```
//!
//! Each step downward uses the [`decoder::Decoder`] trait; the reverse direction
//! uses [`encoder::Encoder`]. The marker traits [`decoder::DecodableFrom`] and
//! [`encoder::EncodableTo`] restrict which conversions exist, so an invalid
//! pairing is rejected at compile time.
//!
//! ## Example
//!
//! ```ignore
//! use codec::decoder::Decoder;
//! use codec::encoder::Encoder;
//! use token::TokenObjectStore;
//!
//! let blob: &[u8] = read_object_directory();
//! let store: TokenObjectStore = blob.decode()?;
//! let bytes: Vec<u8> = store.encode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
