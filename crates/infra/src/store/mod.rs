//! Inventory document storage.
//!
//! A store is a thin persistence boundary: it does not validate, it only
//! reads and writes `InventoryItem` records. The one rule every store must
//! enforce itself is sku uniqueness, so that two concurrent writers cannot
//! both commit the same sku even when an application-level pre-check passed.

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::ItemId;
use stockroom_inventory::{InventoryItem, InventorySummary, ListQuery};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another record already holds this sku.
    #[error("duplicate sku: {0}")]
    DuplicateKey(String),

    /// The backing store could not serve the request (connection, pool, IO).
    #[error("{0}")]
    Unavailable(String),

    /// A stored record could not be decoded into the domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// Items matching the query's filter, in the query's sort order.
    async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError>;

    /// Look up by normalized sku, optionally ignoring one record.
    async fn find_by_sku(
        &self,
        sku: &str,
        excluding: Option<ItemId>,
    ) -> Result<Option<InventoryItem>, StoreError>;

    /// Insert a new record. Fails with `DuplicateKey` if the sku is taken.
    async fn insert(&self, item: &InventoryItem) -> Result<(), StoreError>;

    /// Overwrite an existing record by id.
    ///
    /// Returns `false` if no record has this id. Fails with `DuplicateKey` if
    /// another record holds the new sku.
    async fn replace(&self, item: &InventoryItem) -> Result<bool, StoreError>;

    /// Remove a record, returning the removed snapshot.
    async fn delete(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError>;

    async fn summarize(&self) -> Result<InventorySummary, StoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).list(query).await
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        (**self).get(id).await
    }

    async fn find_by_sku(
        &self,
        sku: &str,
        excluding: Option<ItemId>,
    ) -> Result<Option<InventoryItem>, StoreError> {
        (**self).find_by_sku(sku, excluding).await
    }

    async fn insert(&self, item: &InventoryItem) -> Result<(), StoreError> {
        (**self).insert(item).await
    }

    async fn replace(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        (**self).replace(item).await
    }

    async fn delete(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        (**self).delete(id).await
    }

    async fn summarize(&self) -> Result<InventorySummary, StoreError> {
        (**self).summarize().await
    }
}
