use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use shopcart_core::DomainError;
use shopcart_infra::CartStoreError;

/// Error surfaced by a route handler.
///
/// The `Display` text is exactly what clients see in the `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// No record with the requested id (including ids that do not parse).
    #[error("Item not found")]
    NotFound,

    /// The request body is not valid JSON.
    #[error("Invalid JSON body")]
    MalformedBody,

    /// The store failed; details are logged, not returned.
    #[error("Internal server error")]
    Backend(#[from] CartStoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Backend(e) = &self {
            tracing::error!(error = %e, "cart store failure");
        }
        json_error(self.status(), self.to_string())
    }
}

/// `{ "error": message }` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
