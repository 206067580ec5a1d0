use std::collections::HashMap;
use std::sync::RwLock;

use stockroom_core::ItemId;
use stockroom_inventory::{InventoryItem, InventorySummary, ListQuery};

use super::{InventoryStore, StoreError};

/// In-memory inventory store for tests/dev.
///
/// The sku uniqueness check and the write happen under the same write lock,
/// which is what makes the check authoritative here.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<HashMap<ItemId, InventoryItem>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

fn sku_taken(map: &HashMap<ItemId, InventoryItem>, sku: &str, excluding: Option<ItemId>) -> bool {
    map.values()
        .any(|item| item.sku == sku && Some(item.id) != excluding)
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(query.apply(map.values()))
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_sku(
        &self,
        sku: &str,
        excluding: Option<ItemId>,
    ) -> Result<Option<InventoryItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .find(|item| item.sku == sku && Some(item.id) != excluding)
            .cloned())
    }

    async fn insert(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if sku_taken(&map, &item.sku, None) {
            return Err(StoreError::DuplicateKey(item.sku.clone()));
        }
        map.insert(item.id, item.clone());
        Ok(())
    }

    async fn replace(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(&item.id) {
            return Ok(false);
        }
        if sku_taken(&map, &item.sku, Some(item.id)) {
            return Err(StoreError::DuplicateKey(item.sku.clone()));
        }
        map.insert(item.id, item.clone());
        Ok(true)
    }

    async fn delete(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id))
    }

    async fn summarize(&self) -> Result<InventorySummary, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(InventorySummary::from_items(map.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::{Category, timestamp_now};

    fn item(sku: &str) -> InventoryItem {
        let now = timestamp_now();
        InventoryItem {
            id: ItemId::new(),
            sku: sku.to_string(),
            name: "Widget".to_string(),
            description: None,
            quantity: 1,
            price: 2.0,
            category: Category::Tools,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_rejects_taken_sku() {
        let store = InMemoryInventoryStore::new();
        store.insert(&item("A-1")).await.unwrap();
        let err = store.insert(&item("A-1")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey("A-1".to_string()));
    }

    #[tokio::test]
    async fn replace_allows_own_sku_but_not_anothers() {
        let store = InMemoryInventoryStore::new();
        let a = item("A-1");
        let b = item("B-1");
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        let mut a2 = a.clone();
        a2.quantity = 50;
        assert!(store.replace(&a2).await.unwrap());

        let mut b2 = b.clone();
        b2.sku = "A-1".to_string();
        assert!(matches!(
            store.replace(&b2).await,
            Err(StoreError::DuplicateKey(_))
        ));
    }

    #[tokio::test]
    async fn replace_missing_returns_false() {
        let store = InMemoryInventoryStore::new();
        assert!(!store.replace(&item("X")).await.unwrap());
    }

    #[tokio::test]
    async fn delete_returns_snapshot_once() {
        let store = InMemoryInventoryStore::new();
        let a = item("A-1");
        store.insert(&a).await.unwrap();
        assert_eq!(store.delete(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(store.delete(a.id).await.unwrap(), None);
        assert_eq!(store.get(a.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_by_sku_honours_exclusion() {
        let store = InMemoryInventoryStore::new();
        let a = item("A-1");
        store.insert(&a).await.unwrap();
        assert!(store.find_by_sku("A-1", None).await.unwrap().is_some());
        assert!(store.find_by_sku("A-1", Some(a.id)).await.unwrap().is_none());
    }
}
