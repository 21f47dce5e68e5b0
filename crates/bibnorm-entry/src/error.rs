//! Error types for entry assembly.
//!
//! Macro-resolution failures are per-field: the error carries the entry id
//! and field name so diagnostics can point at the offending field. The
//! normalization functions are total and never contribute errors here, and
//! mandatory-field validation belongs to an external collaborator.

use thiserror::Error;

/// Result type alias for bibnorm-entry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling an entry.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A field's value failed to parse or resolve.
    #[error("entry '{entry_id}', field '{field}': {source}")]
    Field {
        entry_id: String,
        field: String,
        #[source]
        source: bibnorm_field::Error,
    },
}

impl Error {
    pub(crate) fn in_field(
        entry_id: &str,
        field: &str,
        source: bibnorm_field::Error,
    ) -> Self {
        Error::Field {
            entry_id: entry_id.to_string(),
            field: field.to_string(),
            source,
        }
    }
}
