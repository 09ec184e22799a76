use axum::{Router, routing::get};

pub mod cart_items;
pub mod system;

/// Router for the cart resource endpoints.
///
/// The collection answers with and without a trailing slash.
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/cart_items/",
            get(cart_items::list_cart_items).post(cart_items::create_cart_item),
        )
        .nest("/api/cart_items", cart_items::router())
}
