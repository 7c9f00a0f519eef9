//! Orchestrator error types.

use common::{ItemId, OrderId};
use order_store::OrderStoreError;
use thiserror::Error;

/// Errors returned by [`OrderOrchestrator`](crate::OrderOrchestrator).
///
/// Collaborator errors never leak through; each one is folded into one of
/// these variants. Creation failures carry the id the order would have had.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The request was rejected before any collaborator was called.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A cart line references an item inventory does not know.
    #[error("Item {item_id} not found in inventory")]
    ItemNotFound { order_id: OrderId, item_id: ItemId },

    /// Inventory could not be reached, or did not answer in time.
    #[error("Inventory unavailable while pricing order {order_id}: {reason}")]
    UpstreamUnavailable { order_id: OrderId, reason: String },

    /// Inventory rejected the item, or returned a record whose price cannot
    /// be used.
    #[error("Item {item_id} has an unusable inventory record: {reason}")]
    MalformedItem {
        order_id: OrderId,
        item_id: ItemId,
        reason: String,
    },

    /// An order with this id was already written.
    #[error("Order {order_id} already exists")]
    AlreadyExists { order_id: OrderId },

    /// No order with this id.
    #[error("Order {0} not found")]
    ResourceNotFound(OrderId),

    /// The order store failed or did not answer in time.
    #[error("Order store unavailable: {0}")]
    StorageUnavailable(String),
}

impl OrchestratorError {
    /// The order this error concerns, when one is known.
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::ItemNotFound { order_id, .. }
            | Self::UpstreamUnavailable { order_id, .. }
            | Self::MalformedItem { order_id, .. }
            | Self::AlreadyExists { order_id } => Some(order_id),
            Self::ResourceNotFound(id) => Some(id),
            Self::InvalidInput(_) | Self::StorageUnavailable(_) => None,
        }
    }

    /// Whether the same request may succeed if retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::StorageUnavailable(_)
        )
    }
}

impl From<OrderStoreError> for OrchestratorError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::Duplicate(order_id) => Self::AlreadyExists { order_id },
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

/// Convenience type alias for orchestrator results.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
