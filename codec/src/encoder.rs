//! Encoder trait, the reverse of [`crate::decoder::Decoder`].
//!
//! `Encoder<T, E>` is implemented by the source type `T` and produces `E`;
//! `E` must implement [`EncodableTo<T>`].

/// Encoder trait for converting from type `T` to type `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` cannot be represented in `E`, for example
    /// when a length does not fit its wire field.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
pub trait EncodableTo<T> {}
