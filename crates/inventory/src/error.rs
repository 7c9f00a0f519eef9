//! Inventory error types.

use common::ItemId;
use thiserror::Error;

/// Errors raised by an inventory directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An item with this id is already stocked.
    #[error("Item {0} already exists")]
    AlreadyExists(ItemId),

    /// No item with this id.
    #[error("Item {0} not found")]
    NotFound(ItemId),

    /// The item record is not acceptable.
    #[error("Invalid item: {0}")]
    Invalid(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors seen by callers of the inventory gateway.
///
/// `Unavailable` covers every transport-level failure: refused connections,
/// timeouts and unreadable replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Item {0} already exists")]
    AlreadyExists(ItemId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Inventory unavailable: {0}")]
    Unavailable(String),

    #[error("Inventory internal error: {0}")]
    Internal(String),
}

impl From<DirectoryError> for GatewayError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AlreadyExists(id) => GatewayError::AlreadyExists(id),
            DirectoryError::NotFound(id) => GatewayError::NotFound(id),
            DirectoryError::Invalid(msg) => GatewayError::InvalidArgument(msg),
            other => GatewayError::Internal(other.to_string()),
        }
    }
}
