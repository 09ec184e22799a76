use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    routing::get,
};

use shopcart_cart::{CartItem, CartItemPatch, NewCartItem};
use shopcart_core::ItemId;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::CartServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_cart_items).post(create_cart_item))
        .route(
            "/:id",
            get(get_cart_item)
                .put(update_cart_item)
                .delete(delete_cart_item),
        )
}

pub async fn list_cart_items(
    Extension(services): Extension<Arc<CartServices>>,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    Ok(Json(services.list().await?))
}

pub async fn get_cart_item(
    Extension(services): Extension<Arc<CartServices>>,
    Path(id): Path<String>,
) -> Result<Json<CartItem>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(services.get(id).await?))
}

pub async fn create_cart_item(
    Extension(services): Extension<Arc<CartServices>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CartItem>), ApiError> {
    let req: dto::CreateCartItemRequest = dto::parse_body(&headers, &body)?;
    let item = NewCartItem::validate(req.name, req.price)?;

    let created = services.create(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_cart_item(
    Extension(services): Extension<Arc<CartServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CartItem>, ApiError> {
    let id = parse_id(&id)?;
    let req: dto::UpdateCartItemRequest = dto::parse_body(&headers, &body)?;
    let patch = CartItemPatch::validate(req.name, req.price)?;

    Ok(Json(services.update(id, patch).await?))
}

pub async fn delete_cart_item(
    Extension(services): Extension<Arc<CartServices>>,
    Path(id): Path<String>,
) -> Result<Json<CartItem>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(services.delete(id).await?))
}

/// Ids that do not parse can never match a record, so they read as 404.
fn parse_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse::<ItemId>().map_err(|e| {
        tracing::debug!(raw_id = %raw, error = %e, "unparseable cart item id");
        ApiError::from(e)
    })
}
