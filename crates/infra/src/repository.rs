//! Inventory repository: the operation pipeline on top of a store.
//!
//! ```text
//! payload
//!   ↓
//! 1. Sku pre-check (a taken sku wins over validation failures)
//!   ↓
//! 2. Validate (pure, all violations collected)
//!   ↓
//! 3. Write to the store (store-level uniqueness is authoritative)
//! ```
//!
//! Every failure comes back as a `RepositoryError`; the HTTP layer maps
//! variants to status codes.

use thiserror::Error;

use stockroom_core::ItemId;
use stockroom_inventory::{
    InventoryItem, InventorySummary, ItemPatch, ListQuery, NewItem, ValidationErrors,
    timestamp_now, validate,
};

use crate::store::{InventoryStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// One or more validation rules failed.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Another item already holds this sku.
    #[error("SKU already exists")]
    DuplicateKey { sku: String },

    /// The id does not resolve to an item (including malformed ids).
    #[error("Item not found")]
    NotFound,

    /// The store failed for reasons unrelated to the request.
    #[error("{0}")]
    Store(StoreError),
}

impl RepositoryError {
    fn from_store(err: StoreError, sku: &str) -> Self {
        match err {
            StoreError::DuplicateKey(_) => RepositoryError::DuplicateKey {
                sku: sku.to_string(),
            },
            other => RepositoryError::Store(other),
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateKey(sku) => RepositoryError::DuplicateKey { sku },
            other => RepositoryError::Store(other),
        }
    }
}

/// Malformed ids are indistinguishable from absent ones.
fn parse_id(raw: &str) -> Result<ItemId, RepositoryError> {
    raw.trim().parse().map_err(|_| RepositoryError::NotFound)
}

/// CRUD + summary over any `InventoryStore`.
#[derive(Debug, Clone)]
pub struct InventoryRepository<S> {
    store: S,
}

impl<S> InventoryRepository<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.store.list(query).await?)
    }

    pub async fn get(&self, id: &str) -> Result<InventoryItem, RepositoryError> {
        let id = parse_id(id)?;
        self.store.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    pub async fn create(&self, new_item: NewItem) -> Result<InventoryItem, RepositoryError> {
        if let Some(sku) = new_item.target_sku() {
            if self.store.find_by_sku(&sku, None).await?.is_some() {
                return Err(RepositoryError::DuplicateKey { sku });
            }
        }

        let valid = validate(new_item.into_draft())?;

        let item = InventoryItem::create(ItemId::new(), valid, timestamp_now());
        self.store
            .insert(&item)
            .await
            .map_err(|e| RepositoryError::from_store(e, &item.sku))?;

        tracing::info!(item_id = %item.id, sku = %item.sku, "inventory item created");
        Ok(item)
    }

    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<InventoryItem, RepositoryError> {
        let id = parse_id(id)?;
        let existing = self.store.get(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(sku) = patch.target_sku() {
            if self.store.find_by_sku(&sku, Some(id)).await?.is_some() {
                return Err(RepositoryError::DuplicateKey { sku });
            }
        }

        let valid = validate(existing.merge(patch))?;

        let revised = existing.revise(valid, timestamp_now());
        let replaced = self
            .store
            .replace(&revised)
            .await
            .map_err(|e| RepositoryError::from_store(e, &revised.sku))?;
        if !replaced {
            // Deleted between the read and the write.
            return Err(RepositoryError::NotFound);
        }

        tracing::info!(item_id = %revised.id, sku = %revised.sku, "inventory item updated");
        Ok(revised)
    }

    pub async fn delete(&self, id: &str) -> Result<InventoryItem, RepositoryError> {
        let id = parse_id(id)?;
        let removed = self.store.delete(id).await?.ok_or(RepositoryError::NotFound)?;
        tracing::info!(item_id = %removed.id, sku = %removed.sku, "inventory item deleted");
        Ok(removed)
    }

    pub async fn summarize(&self) -> Result<InventorySummary, RepositoryError> {
        Ok(self.store.summarize().await?)
    }
}
