//! Infrastructure layer: record stores backing the cart API.

pub mod cart_store;

pub use cart_store::{CartItemStore, CartStoreError, InMemoryCartStore, PostgresCartStore};
