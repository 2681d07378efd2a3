//! Decoder trait for type-safe conversions.
//!
//! # Design Pattern
//!
//! 1. `Decoder<T, D>` performs the conversion from `T` to `D`
//! 2. `DecodableFrom<T>` marks `D` as a valid destination for `T`
//!
//! # Implementation Guide
//!
//! ```no_run
//! use codec::decoder::{DecodableFrom, Decoder};
//!
//! struct Label(String);
//!
//! #[derive(Debug)]
//! struct NotUtf8;
//!
//! impl DecodableFrom<Vec<u8>> for Label {}
//!
//! impl Decoder<Vec<u8>, Label> for Vec<u8> {
//!     type Error = NotUtf8;
//!
//!     fn decode(&self) -> Result<Label, Self::Error> {
//!         String::from_utf8(self.clone()).map(Label).map_err(|_| NotUtf8)
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type (usually `Self == T`). The destination must
/// implement [`DecodableFrom<T>`].
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
pub trait DecodableFrom<T> {}
