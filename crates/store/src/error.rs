//! Store error type.

use pulse_core::error::CoreError;

/// Errors surfaced by [`EventStore`](crate::store::EventStore) and
/// [`ActionStore`](crate::store::ActionStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entity with the same name already exists in the org.
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// The requested entity does not exist.
    #[error("{entity} not found: {name}")]
    NotFound {
        entity: &'static str,
        name: String,
    },

    /// The input failed domain validation.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Backend-specific failure (connection loss, corrupt row, etc.).
    #[error("Store error: {0}")]
    Internal(String),
}
