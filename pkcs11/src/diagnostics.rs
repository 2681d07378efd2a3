//! Caller-supplied sink for recoverable parse findings.
//!
//! Nothing here aborts a parse. Each finding is handed to the [`Diagnostics`]
//! value the caller passed in, so the codec holds no global logger.

use tracing::{debug, warn};

use crate::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Card data carried an attribute id outside the known table. It was skipped.
    UnknownAttribute {
        object_id: ObjectId,
        attribute_id: u32,
        length: usize,
    },
    /// The object table held an object whose type is not c, k or C. It was skipped.
    SkippedObject { object_id: ObjectId },
    /// An object with the same id was already stored and has been replaced.
    ReplacedObject { object_id: ObjectId },
    /// The object table ended before the declared number of objects was read.
    MissingObjects { declared: u16, found: u16 },
    /// Bytes left in the object table after the declared number of objects.
    /// They are not parsed.
    TrailingBytes { count: usize },
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects every diagnostic in order.
impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything.
impl Diagnostics for () {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Emits each diagnostic as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnknownAttribute {
                object_id,
                attribute_id,
                length,
            } => warn!(
                %object_id,
                attribute_id = format_args!("0x{attribute_id:08x}"),
                length,
                "skipping unrecognized attribute"
            ),
            Diagnostic::SkippedObject { object_id } => {
                warn!(%object_id, "skipping object of unknown type")
            }
            Diagnostic::ReplacedObject { object_id } => {
                debug!(%object_id, "replaced object with the same id")
            }
            Diagnostic::MissingObjects { declared, found } => {
                warn!(declared, found, "object table shorter than declared count")
            }
            Diagnostic::TrailingBytes { count } => {
                debug!(count, "ignoring bytes after the declared objects")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_collects_in_order() {
        let object_id = ObjectId::new('k', 3).unwrap();
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::SkippedObject { object_id });
        sink.report(Diagnostic::MissingObjects {
            declared: 2,
            found: 1,
        });
        assert_eq!(
            sink,
            vec![
                Diagnostic::SkippedObject { object_id },
                Diagnostic::MissingObjects {
                    declared: 2,
                    found: 1
                },
            ]
        );
    }

    #[test]
    fn test_tracing_sink_accepts_every_variant() {
        let object_id = ObjectId::new('c', 0).unwrap();
        let mut sink = TracingDiagnostics;
        sink.report(Diagnostic::UnknownAttribute {
            object_id,
            attribute_id: 0x8000_0001,
            length: 2,
        });
        sink.report(Diagnostic::SkippedObject { object_id });
        sink.report(Diagnostic::ReplacedObject { object_id });
        sink.report(Diagnostic::MissingObjects {
            declared: 3,
            found: 2,
        });
        sink.report(Diagnostic::TrailingBytes { count: 30 });
    }
}
