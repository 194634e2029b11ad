use thiserror::Error;

use crate::ReferenceKind;

/// Errors that can occur when interacting with the inventory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row does not exist (or vanished before the write).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A case-insensitive unique index rejected the write.
    #[error("{entity} '{value}' already exists")]
    UniqueViolation { entity: &'static str, value: String },

    /// A reference record could not be deleted because receipt items use it.
    #[error("{kind} {id} is referenced by receipt items")]
    InUse { kind: ReferenceKind, id: i64 },

    /// A receipt item pointed at a reference record that does not exist.
    #[error("{kind} {id} does not exist")]
    MissingReference { kind: ReferenceKind, id: i64 },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for inventory store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
