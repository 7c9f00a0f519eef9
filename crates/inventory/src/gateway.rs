//! Caller-side view of the inventory service.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::ItemId;
use domain::Item;

use crate::directory::{InMemoryDirectory, InventoryDirectory};
use crate::error::GatewayError;

/// Request/response operations offered by the inventory service.
///
/// Every call is a single round trip touching a single record.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Fetches the authoritative record for `id`, or `NotFound`.
    async fn get_item(&self, id: &ItemId) -> Result<Item, GatewayError>;

    /// Stocks a new item, or `AlreadyExists`.
    async fn create(&self, item: Item) -> Result<(), GatewayError>;

    /// Overwrites an existing item, or `NotFound`.
    async fn update(&self, item: Item) -> Result<(), GatewayError>;

    /// Removes an item, or `NotFound` when nothing was removed.
    async fn delete(&self, id: &ItemId) -> Result<(), GatewayError>;
}

#[async_trait]
impl<T: InventoryGateway + ?Sized> InventoryGateway for Arc<T> {
    async fn get_item(&self, id: &ItemId) -> Result<Item, GatewayError> {
        (**self).get_item(id).await
    }

    async fn create(&self, item: Item) -> Result<(), GatewayError> {
        (**self).create(item).await
    }

    async fn update(&self, item: Item) -> Result<(), GatewayError> {
        (**self).update(item).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), GatewayError> {
        (**self).delete(id).await
    }
}

/// Gateway that reaches a directory in-process, with no network hop.
///
/// Used when the order service and the inventory directory share a process,
/// and by the RPC server to answer remote calls.
#[derive(Debug, Clone)]
pub struct LocalInventoryGateway<D> {
    directory: D,
}

impl<D: InventoryDirectory> LocalInventoryGateway<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}

#[async_trait]
impl<D: InventoryDirectory> InventoryGateway for LocalInventoryGateway<D> {
    async fn get_item(&self, id: &ItemId) -> Result<Item, GatewayError> {
        self.directory
            .get(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn create(&self, item: Item) -> Result<(), GatewayError> {
        Ok(self.directory.insert(item).await?)
    }

    async fn update(&self, item: Item) -> Result<(), GatewayError> {
        Ok(self.directory.update(item).await?)
    }

    async fn delete(&self, id: &ItemId) -> Result<(), GatewayError> {
        match self.directory.delete(id).await? {
            0 => Err(GatewayError::NotFound(id.clone())),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    unavailable_for: Option<ItemId>,
    latency: Option<Duration>,
    lookups: Vec<ItemId>,
}

/// In-memory gateway for testing.
///
/// Backed by an [`InMemoryDirectory`]; records every `get_item` call and can
/// simulate transport outages and slow replies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryGateway {
    inner: LocalInventoryGateway<InMemoryDirectory>,
    faults: Arc<Mutex<Faults>>,
}

impl Default for LocalInventoryGateway<InMemoryDirectory> {
    fn default() -> Self {
        Self::new(InMemoryDirectory::new())
    }
}

impl InMemoryInventoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway whose directory holds `items`.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            inner: LocalInventoryGateway::new(InMemoryDirectory::with_items(items)),
            faults: Arc::default(),
        }
    }

    /// The backing directory, for direct data access.
    pub fn directory(&self) -> &InMemoryDirectory {
        self.inner.directory()
    }

    /// Fails every call with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults().unavailable = unavailable;
    }

    /// Fails only lookups of `id` with `Unavailable`.
    pub fn set_unavailable_for(&self, id: Option<ItemId>) {
        self.faults().unavailable_for = id;
    }

    /// Delays every lookup by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.faults().latency = latency;
    }

    /// Ids passed to `get_item`, in call order.
    pub fn lookups(&self) -> Vec<ItemId> {
        self.faults().lookups.clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.faults().lookups.len()
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self, id: Option<&ItemId>) -> Result<(), GatewayError> {
        let faults = self.faults();
        if faults.unavailable {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        if let Some(id) = id
            && faults.unavailable_for.as_ref() == Some(id)
        {
            return Err(GatewayError::Unavailable(format!(
                "connection reset while fetching {id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryGateway for InMemoryInventoryGateway {
    async fn get_item(&self, id: &ItemId) -> Result<Item, GatewayError> {
        let latency = {
            let mut faults = self.faults();
            faults.lookups.push(id.clone());
            faults.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.check_available(Some(id))?;
        self.inner.get_item(id).await
    }

    async fn create(&self, item: Item) -> Result<(), GatewayError> {
        self.check_available(None)?;
        self.inner.create(item).await
    }

    async fn update(&self, item: Item) -> Result<(), GatewayError> {
        self.check_available(None)?;
        self.inner.update(item).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), GatewayError> {
        self.check_available(None)?;
        self.inner.delete(id).await
    }
}
