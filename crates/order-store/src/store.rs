use std::sync::Arc;

use async_trait::async_trait;
use domain::{CartLine, Order};

use crate::{OrderId, Result};

/// Core trait for order store implementations.
///
/// All implementations must be thread-safe (Send + Sync) and serialize
/// conflicting writes to the same document internally.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes a new order as a single document.
    ///
    /// Fails with `Duplicate` if an order with the same id already exists;
    /// the existing document is left untouched.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Retrieves an order by id.
    ///
    /// Returns None if no such order exists.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Retrieves every stored order, oldest first.
    async fn find_all(&self) -> Result<Vec<Order>>;

    /// Replaces the entire line sequence of an order.
    ///
    /// Returns the number of documents changed (0 or 1).
    async fn replace_lines(&self, id: &OrderId, lines: Vec<CartLine>) -> Result<u64>;

    /// Deletes an order.
    ///
    /// Returns the number of documents removed (0 or 1).
    async fn delete(&self, id: &OrderId) -> Result<u64>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn insert(&self, order: &Order) -> Result<()> {
        (**self).insert(order).await
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        (**self).find_all().await
    }

    async fn replace_lines(&self, id: &OrderId, lines: Vec<CartLine>) -> Result<u64> {
        (**self).replace_lines(id, lines).await
    }

    async fn delete(&self, id: &OrderId) -> Result<u64> {
        (**self).delete(id).await
    }
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Checks if an order exists.
    async fn exists(&self, id: &OrderId) -> Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}
