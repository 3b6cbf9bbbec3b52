//! # Service Errors
//!
//! Errors surfaced to the boundary layer, rendered as HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// No service is registered under this name
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Path identifier is not a record id
    #[error("No record found for id {0}")]
    InvalidId(String),

    /// Store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal failure (poisoned lock)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::UnknownResource(_) | ServiceError::InvalidId(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Store(err) => err.status_code(),
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
