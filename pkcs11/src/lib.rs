//! PKCS#11 attribute and object records of a token object directory.
//!
//! * [`AttributeSpec`]: one attribute record and its wire codec
//! * [`ObjectSpec`]: one token object, its fixed-attribute word and the
//!   classification of card attribute streams
//! * [`ObjectId`]: the 4-byte object id and its human-readable form
//!
//! This crate performs no I/O and keeps no global state. Recoverable findings
//! go to a caller-supplied [`Diagnostics`] sink.

#![forbid(unsafe_code)]

pub mod attribute;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod fixed;
pub mod object;
pub mod object_id;
mod wire;

pub use attribute::{AttributeSpec, AttributeValue, ValueType};
pub use constants::{Attribute, ObjectClass, Role};
pub use diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics};
pub use error::{Error, ErrorKind, Result};
pub use fixed::{FixedAttributes, FixedFlag};
pub use object::ObjectSpec;
pub use object_id::{ObjectId, ObjectType};
