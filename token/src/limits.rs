//! Parse limits.
//!
//! The codec reads no files or environment. These bounds are its only
//! configuration; [`Limits::default`] matches what deployed card applets write.

/// Highest declared object count a blob may carry.
pub const MAX_OBJECTS: u16 = 100;

/// Largest inflated object data accepted from a compressed blob.
pub const MAX_INFLATED_SIZE: usize = 0x4_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_objects: u16,
    pub max_inflated_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_objects: MAX_OBJECTS,
            max_inflated_size: MAX_INFLATED_SIZE,
        }
    }
}
