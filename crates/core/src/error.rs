//! Errors raised while turning client input into cart values.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected client input. Both variants are the caller's to fix; store and
/// transport failures have their own error types downstream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was absent, or `name` was not a non-empty string.
    /// The payload is the message returned to the client.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A path segment that does not spell a whole-number item id.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
