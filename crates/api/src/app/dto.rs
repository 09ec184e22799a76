use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/cart_items`.
///
/// Fields stay raw so validation can tell "absent" (`None`) from "sent as
/// null" (`Some(Value::Null)`).
#[derive(Debug, Default, Deserialize)]
pub struct CreateCartItemRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
}

/// Body of `PUT /api/cart_items/:id`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCartItemRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// -------------------------
// Body parsing
// -------------------------

/// Parse a JSON request body leniently.
///
/// A body not declared as JSON, an empty body, or a JSON value that is not an
/// object is treated as `{}` so that presence validation reports the missing
/// fields. Only JSON-typed bodies that fail to parse are rejected here.
pub fn parse_body<T>(headers: &HeaderMap, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !is_json(headers) {
        tracing::debug!("ignoring request body without a JSON content type");
        return Ok(T::default());
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed JSON body");
        ApiError::MalformedBody
    })?;

    if !value.is_object() {
        return Ok(T::default());
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "request body does not match the expected shape");
        ApiError::MalformedBody
    })
}

/// `Content-Type: application/json`, parameters such as `charset` ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json"
}
