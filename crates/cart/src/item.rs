use serde::{Deserialize, Serialize};
use serde_json::Value;

use shopcart_core::{DomainError, DomainResult, Entity, ItemId};

/// Error message returned when a create request lacks `name` or `price`.
pub const CREATE_REQUIRED_MESSAGE: &str = "Name and price are required";

/// Error message returned when an update request carries nothing usable.
pub const UPDATE_REQUIRED_MESSAGE: &str = "Name or price is required";

/// Price of a cart item.
///
/// Stored as the JSON value the client sent so it is echoed back unchanged
/// (`45` stays `45`). Only presence is checked; `null` and non-numeric values
/// are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Value);

impl Price {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Price {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

/// A stored cart item.
///
/// Field order is the JSON order clients see: `{id, name, price}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
}

impl CartItem {
    /// Materialize a record from validated input and a store-assigned id.
    pub fn from_new(id: ItemId, item: NewCartItem) -> Self {
        Self {
            id,
            name: item.name,
            price: item.price,
        }
    }

    /// Apply the present fields of `patch` in place. The id never changes.
    pub fn apply(&mut self, patch: &CartItemPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = &patch.price {
            self.price = price.clone();
        }
    }
}

impl Entity for CartItem {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating a cart item (no id yet).
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    name: String,
    price: Price,
}

impl NewCartItem {
    /// Build without validation. Stores accept whatever they are given;
    /// use [`NewCartItem::validate`] at the request boundary.
    pub fn new(name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }

    /// Validate raw request fields.
    ///
    /// `None` means the field was absent from the request; `Some(Value::Null)`
    /// means it was sent as `null`. The name must be a non-empty string and the
    /// price must be present.
    pub fn validate(name: Option<Value>, price: Option<Value>) -> DomainResult<Self> {
        match (non_empty_name(name), price) {
            (Some(name), Some(price)) => Ok(Self {
                name,
                price: Price::new(price),
            }),
            _ => Err(DomainError::validation(CREATE_REQUIRED_MESSAGE)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &Price {
        &self.price
    }
}

/// Partial update of a cart item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartItemPatch {
    name: Option<String>,
    price: Option<Price>,
}

impl CartItemPatch {
    pub fn new(name: Option<String>, price: Option<Price>) -> Self {
        Self { name, price }
    }

    /// Validate raw request fields for an update.
    ///
    /// At least one field must be present, and a present name must be a
    /// non-empty string.
    pub fn validate(name: Option<Value>, price: Option<Value>) -> DomainResult<Self> {
        if name.is_none() && price.is_none() {
            return Err(DomainError::validation(UPDATE_REQUIRED_MESSAGE));
        }

        let name = match name {
            None => None,
            Some(raw) => match non_empty_name(Some(raw)) {
                Some(n) => Some(n),
                None => return Err(DomainError::validation("Name must be a non-empty string")),
            },
        };

        Ok(Self {
            name,
            price: price.map(Price::new),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn price(&self) -> Option<&Price> {
        self.price.as_ref()
    }
}

fn non_empty_name(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
