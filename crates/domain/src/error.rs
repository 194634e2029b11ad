//! Domain error types.

use inventory_store::{ReferenceKind, StoreError};
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Every variant except [`DomainError::Store`] describes a rejected
/// submission that the caller can correct and resubmit.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field is missing or too long.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Another resource or unit already has this name.
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName { kind: ReferenceKind, name: String },

    /// Another receipt document already has this number.
    #[error("A receipt document numbered '{number}' already exists")]
    DuplicateNumber { number: String },

    /// A submitted line is neither empty nor complete.
    #[error(
        "Line {line} is only partially filled: remove it or fill in resource, unit and a positive quantity"
    )]
    IncompleteLine { line: usize },

    /// The resource or unit is referenced by receipt items.
    #[error("Cannot delete {kind} {id} because receipt documents use it; archive it instead")]
    InUse { kind: ReferenceKind, id: i64 },

    /// The entity does not exist (or vanished before the write).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// An error occurred in the inventory store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            StoreError::InUse { kind, id } => DomainError::InUse { kind, id },
            StoreError::MissingReference { kind, id } => DomainError::NotFound {
                entity: kind.label(),
                id,
            },
            other => DomainError::Store(other),
        }
    }
}
