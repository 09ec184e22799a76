//! Postgres-backed cart item store.
//!
//! Rows live in a single `cart_items` table keyed by a `BIGSERIAL` id, so id
//! uniqueness and monotonicity come from the database sequence. Prices are
//! stored as `JSONB` to round-trip whatever value the client sent.
//!
//! ## Error Mapping
//!
//! Every SQLx failure becomes `CartStoreError::Backend`. A missing row is not
//! an error: queries use `fetch_optional` and surface `Ok(None)`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use tracing::instrument;

use shopcart_cart::{CartItem, CartItemPatch, NewCartItem, Price};
use shopcart_core::ItemId;

use super::{CartItemStore, CartStoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cart_items (
    id    BIGSERIAL PRIMARY KEY,
    name  TEXT NOT NULL,
    price JSONB
)
"#;

/// Persistent cart item store over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCartStore {
    pool: Arc<PgPool>,
}

impl PostgresCartStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, CartStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `cart_items` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), CartStoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl CartItemStore for PostgresCartStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<CartItem>, CartStoreError> {
        let rows = sqlx::query("SELECT id, name, price FROM cart_items ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_item).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        let Some(key) = db_key(id) else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT id, name, price FROM cart_items WHERE id = $1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(row_to_item).transpose()
    }

    #[instrument(skip(self, item), err)]
    async fn create(&self, item: NewCartItem) -> Result<CartItem, CartStoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO cart_items (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price
            "#,
        )
        .bind(item.name())
        .bind(item.price().as_json())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        row_to_item(&row)
    }

    #[instrument(skip(self, patch), err)]
    async fn update(
        &self,
        id: ItemId,
        patch: CartItemPatch,
    ) -> Result<Option<CartItem>, CartStoreError> {
        let Some(key) = db_key(id) else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            UPDATE cart_items
            SET name  = COALESCE($2, name),
                price = CASE WHEN $3 THEN $4 ELSE price END
            WHERE id = $1
            RETURNING id, name, price
            "#,
        )
        .bind(key)
        .bind(patch.name())
        .bind(patch.price().is_some())
        .bind(patch.price().map(Price::as_json))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.as_ref().map(row_to_item).transpose()
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&self, id: ItemId) -> Result<Option<CartItem>, CartStoreError> {
        let Some(key) = db_key(id) else {
            return Ok(None);
        };

        let row = sqlx::query("DELETE FROM cart_items WHERE id = $1 RETURNING id, name, price")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        row.as_ref().map(row_to_item).transpose()
    }
}

/// Ids beyond `i64::MAX` cannot exist in a `BIGSERIAL` column.
fn db_key(id: ItemId) -> Option<i64> {
    i64::try_from(id.get()).ok()
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<CartItem, CartStoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| CartStoreError::Backend(format!("failed to read id: {e}")))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| CartStoreError::Backend(format!("failed to read name: {e}")))?;
    let price: Option<JsonValue> = row
        .try_get("price")
        .map_err(|e| CartStoreError::Backend(format!("failed to read price: {e}")))?;

    let id = u64::try_from(id)
        .map_err(|_| CartStoreError::Backend(format!("negative id {id} in cart_items")))?;

    Ok(CartItem {
        id: ItemId::new(id),
        name,
        price: Price::new(price.unwrap_or(JsonValue::Null)),
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CartStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            CartStoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            CartStoreError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => CartStoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}
