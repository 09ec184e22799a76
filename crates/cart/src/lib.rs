//! Cart domain module.
//!
//! This crate contains the cart-item record and its input rules, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{
    CREATE_REQUIRED_MESSAGE, CartItem, CartItemPatch, NewCartItem, Price, UPDATE_REQUIRED_MESSAGE,
};
