use std::sync::Arc;

use shopcart_cart::{CartItem, CartItemPatch, NewCartItem};
use shopcart_core::ItemId;
use shopcart_infra::{CartItemStore, CartStoreError, InMemoryCartStore, PostgresCartStore};

use crate::app::errors::ApiError;
use crate::config::ApiConfig;

/// Which store implementation backs the API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::InMemory => "in_memory",
            StoreBackend::Postgres => "postgres",
        }
    }
}

/// Store handle plus the cart operations route handlers call.
///
/// Inputs arrive already validated; this layer turns "no such record" into
/// `ApiError::NotFound` and logs mutations.
#[derive(Clone)]
pub struct CartServices {
    store: Arc<dyn CartItemStore>,
    backend: StoreBackend,
}

impl CartServices {
    pub fn new(store: Arc<dyn CartItemStore>, backend: StoreBackend) -> Self {
        Self { store, backend }
    }

    /// Services over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCartStore::new()), StoreBackend::InMemory)
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    pub async fn list(&self) -> Result<Vec<CartItem>, ApiError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: ItemId) -> Result<CartItem, ApiError> {
        self.store.find_by_id(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn create(&self, item: NewCartItem) -> Result<CartItem, ApiError> {
        let created = self.store.create(item).await?;
        tracing::info!(id = %created.id, "cart item created");
        Ok(created)
    }

    pub async fn update(&self, id: ItemId, patch: CartItemPatch) -> Result<CartItem, ApiError> {
        let updated = self
            .store
            .update(id, patch)
            .await?
            .ok_or(ApiError::NotFound)?;
        tracing::info!(id = %id, "cart item updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: ItemId) -> Result<CartItem, ApiError> {
        let removed = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        tracing::info!(id = %id, "cart item deleted");
        Ok(removed)
    }
}

/// Pick and prepare the store named by the configuration.
///
/// With `DATABASE_URL` set this connects to Postgres and creates the
/// `cart_items` table if needed; otherwise records live in process memory.
pub async fn build_services(config: &ApiConfig) -> Result<CartServices, CartStoreError> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresCartStore::connect(url, config.db_max_connections).await?;
            store.migrate().await?;
            Ok(CartServices::new(Arc::new(store), StoreBackend::Postgres))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; cart items are kept in memory only");
            Ok(CartServices::in_memory())
        }
    }
}
