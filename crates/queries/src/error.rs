//! Query error types.

use thiserror::Error;

/// Errors that can occur while reading a view.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An error occurred in the inventory store.
    #[error("Store error: {0}")]
    Store(#[from] inventory_store::StoreError),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
