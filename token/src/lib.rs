//! Token object directory.
//!
//! A smart card managed by the token processing system keeps its PKCS#11
//! objects in a single blob: a 20-byte header, then optionally
//! zlib-compressed object data holding the token name and a flat table of
//! objects. [`TokenObjectStore`] parses that blob, splits each certificate out
//! of its attribute container, answers enrollment queries and writes the blob
//! back with objects regrouped per container.
//!
//! ```ignore
//! use token::{Limits, TokenObjectStore};
//! use pkcs11::TracingDiagnostics;
//!
//! let store = TokenObjectStore::parse(&blob, 0, &Limits::default(), &mut TracingDiagnostics)?;
//! let slot = store.next_free_cert_index();
//! let updated = store.get_compressed_data()?;
//! ```

#![forbid(unsafe_code)]

mod compression;
pub mod error;
pub mod header;
pub mod limits;
pub mod store;
mod wire;

pub use error::{Error, Result};
pub use header::{CUID_LEN, Compression, HEADER_LEN};
pub use limits::Limits;
pub use store::TokenObjectStore;
