use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain::{CartLine, Order};
use tokio::sync::RwLock;

use crate::{OrderId, OrderStoreError, Result, store::OrderStore};

/// In-memory order store implementation for testing and local runs.
///
/// Provides the same interface as the PostgreSQL implementation. Orders are
/// kept in insertion order. Outage and latency can be simulated.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
    unavailable: Arc<AtomicBool>,
    latency: Arc<std::sync::RwLock<Option<Duration>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Makes every subsequent call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delays every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.latency.write() {
            *guard = latency;
        }
    }

    async fn check_available(&self) -> Result<()> {
        let latency = self.latency.read().ok().and_then(|guard| *guard);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        self.check_available().await?;

        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(OrderStoreError::Duplicate(order.id.clone()));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        self.check_available().await?;

        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        self.check_available().await?;

        Ok(self.orders.read().await.clone())
    }

    async fn replace_lines(&self, id: &OrderId, lines: Vec<CartLine>) -> Result<u64> {
        self.check_available().await?;

        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| &o.id == id) {
            Some(order) => {
                order.lines = lines;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &OrderId) -> Result<u64> {
        self.check_available().await?;

        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| &o.id != id);
        Ok((before - orders.len()) as u64)
    }
}
