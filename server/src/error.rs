//! FILENAME: server/src/error.rs
//! API error taxonomy and its JSON representation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or parameters could not be parsed. Rejected
    /// immediately, no partial processing.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// A filter value was not a scalar (or not representable as one).
    #[error("unsupported filter value for '{0}': expected a string or number")]
    InvalidFilter(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) | ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::Source(SourceError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("request rejected ({}): {}", status, self);
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}
