use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use shopcart_cart::{CartItem, CartItemPatch, NewCartItem};
use shopcart_core::{Entity, ItemId};

use super::{CartItemStore, CartStoreError};

#[derive(Debug)]
struct CartState {
    items: Vec<CartItem>,
    next_id: ItemId,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: ItemId::FIRST,
        }
    }
}

/// In-memory, insertion-ordered cart item store.
///
/// Records and the id counter sit behind a single lock so id assignment and
/// list mutation are atomic with respect to each other. Lookups are linear
/// scans. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    state: RwLock<CartState>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the store and restart ids at 1.
    #[cfg(any(test, feature = "test-hooks"))]
    pub fn reset(&self) -> Result<(), CartStoreError> {
        *self.write()? = CartState::default();
        tracing::debug!("cart store reset");
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CartState>, CartStoreError> {
        self.state.read().map_err(|_| CartStoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CartState>, CartStoreError> {
        self.state.write().map_err(|_| CartStoreError::LockPoisoned)
    }

    fn snapshot(&self) -> Result<Vec<CartItem>, CartStoreError> {
        Ok(self.read()?.items.clone())
    }

    fn lookup(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        let state = self.read()?;
        Ok(state.items.iter().find(|i| i.has_id(id)).cloned())
    }

    fn insert(&self, item: NewCartItem) -> Result<CartItem, CartStoreError> {
        let mut state = self.write()?;
        let id = state.next_id;
        state.next_id = id.next();

        let record = CartItem::from_new(id, item);
        state.items.push(record.clone());
        tracing::debug!(id = %id, "cart item created");
        Ok(record)
    }

    fn patch(&self, id: ItemId, patch: &CartItemPatch) -> Result<Option<CartItem>, CartStoreError> {
        let mut state = self.write()?;
        let Some(record) = state.items.iter_mut().find(|i| i.has_id(id)) else {
            return Ok(None);
        };
        record.apply(patch);
        tracing::debug!(id = %id, "cart item updated");
        Ok(Some(record.clone()))
    }

    fn remove(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        let mut state = self.write()?;
        let Some(idx) = state.items.iter().position(|i| i.has_id(id)) else {
            return Ok(None);
        };
        let removed = state.items.remove(idx);
        tracing::debug!(id = %id, "cart item deleted");
        Ok(Some(removed))
    }
}

#[async_trait]
impl CartItemStore for InMemoryCartStore {
    async fn list(&self) -> Result<Vec<CartItem>, CartStoreError> {
        self.snapshot()
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        self.lookup(id)
    }

    async fn create(&self, item: NewCartItem) -> Result<CartItem, CartStoreError> {
        self.insert(item)
    }

    async fn update(
        &self,
        id: ItemId,
        patch: CartItemPatch,
    ) -> Result<Option<CartItem>, CartStoreError> {
        self.patch(id, &patch)
    }

    async fn delete_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        self.remove(id)
    }
}
