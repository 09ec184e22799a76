//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a stored record.
///
/// Ids are positive integers handed out by the store from a counter that starts
/// at 1 and never goes backwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// First id handed out by a fresh store.
    pub const FIRST: ItemId = ItemId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ItemId> for u64 {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    /// Accepts any numeric spelling of a whole number (`7`, `+7`, `07`,
    /// `7.0`, `7e0`), surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Ok(value) = raw.parse::<u64>() {
            return Ok(Self(value));
        }

        let value = raw
            .parse::<f64>()
            .map_err(|e| DomainError::invalid_id(format!("ItemId: {e}")))?;
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_EXACT_FLOAT {
            Ok(Self(value as u64))
        } else {
            Err(DomainError::invalid_id(format!("ItemId: {raw:?} is not a whole number")))
        }
    }
}

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;
