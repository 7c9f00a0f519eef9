//! Inventory directory trait and in-memory implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ItemId;
use domain::Item;
use tokio::sync::RwLock;

use crate::error::DirectoryError;

/// Authoritative item store with direct data access.
///
/// Every operation touches a single record.
#[async_trait]
pub trait InventoryDirectory: Send + Sync {
    /// Point lookup. Returns None when the id is not stocked.
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, DirectoryError>;

    /// All stocked items, ordered by id.
    async fn list(&self) -> Result<Vec<Item>, DirectoryError>;

    /// Adds a new item. Fails with `AlreadyExists` on a duplicate id.
    async fn insert(&self, item: Item) -> Result<(), DirectoryError>;

    /// Overwrites name, quantity and price of an existing item.
    /// Fails with `NotFound` when the id is absent.
    async fn update(&self, item: Item) -> Result<(), DirectoryError>;

    /// Removes an item, returning how many records were deleted (0 or 1).
    async fn delete(&self, id: &ItemId) -> Result<u64, DirectoryError>;
}

pub(crate) fn validate(item: &Item) -> Result<(), DirectoryError> {
    if item.id.is_blank() {
        return Err(DirectoryError::Invalid("item id is required".to_string()));
    }
    Ok(())
}

/// In-memory directory for tests and single-process runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    items: Arc<RwLock<BTreeMap<ItemId, Item>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-loaded with `items`. Later duplicates win.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let map = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }
}

#[async_trait]
impl InventoryDirectory for InMemoryDirectory {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, DirectoryError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Item>, DirectoryError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn insert(&self, item: Item) -> Result<(), DirectoryError> {
        validate(&item)?;
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(DirectoryError::AlreadyExists(item.id));
        }
        items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<(), DirectoryError> {
        validate(&item)?;
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(item.id)),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<u64, DirectoryError> {
        Ok(self.items.write().await.remove(id).map_or(0, |_| 1))
    }
}
