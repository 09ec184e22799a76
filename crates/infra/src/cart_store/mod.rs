//! Cart item store boundary.
//!
//! This module defines the storage contract the HTTP layer talks to, without
//! making any storage assumptions. Two implementations ship with the crate:
//! a process-local [`InMemoryCartStore`] and a [`PostgresCartStore`] over a
//! `cart_items` table.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shopcart_cart::{CartItem, CartItemPatch, NewCartItem};
use shopcart_core::ItemId;

pub use in_memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartStoreError {
    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The backing database failed or returned unreadable data.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Keyed, insertion-ordered collection of cart items.
///
/// "Not found" is not an error: lookups and removals return `Ok(None)`.
/// Implementations do not validate input; that happens at the request boundary.
#[async_trait]
pub trait CartItemStore: Send + Sync {
    /// All current records, ordered by insertion (ascending id).
    async fn list(&self) -> Result<Vec<CartItem>, CartStoreError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError>;

    /// Assign the next id, append the record and return it.
    async fn create(&self, item: NewCartItem) -> Result<CartItem, CartStoreError>;

    /// Apply `patch` to the record in place and return the updated record.
    async fn update(
        &self,
        id: ItemId,
        patch: CartItemPatch,
    ) -> Result<Option<CartItem>, CartStoreError>;

    /// Remove the record and return it.
    async fn delete_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError>;
}

#[async_trait]
impl<S> CartItemStore for Arc<S>
where
    S: CartItemStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<CartItem>, CartStoreError> {
        (**self).list().await
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, item: NewCartItem) -> Result<CartItem, CartStoreError> {
        (**self).create(item).await
    }

    async fn update(
        &self,
        id: ItemId,
        patch: CartItemPatch,
    ) -> Result<Option<CartItem>, CartStoreError> {
        (**self).update(id, patch).await
    }

    async fn delete_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        (**self).delete_by_id(id).await
    }
}
