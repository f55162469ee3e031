//! Opaque identifiers for entities and keyed sub-records.

use uuid::Uuid;

/// Returns a fresh, process-unique identifier.
///
/// Ids are random (v4) and carry no ordering. Callers assign them once at
/// construction and never regenerate them.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
