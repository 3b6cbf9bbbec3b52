//! # Store Errors
//!
//! Error types for the record store and query translation.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
///
/// All variants are local and recoverable at the boundary layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Operation targets an identifier that is not in the store
    #[error("No record found for id {0}")]
    NotFound(u64),

    /// Malformed pagination, sort, or filter parameter
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Body is not a well-formed record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            StoreError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub(crate) fn invalid_query(msg: impl Into<String>) -> Self {
        StoreError::InvalidQuery(msg.into())
    }

    pub(crate) fn invalid_record(msg: impl Into<String>) -> Self {
        StoreError::InvalidRecord(msg.into())
    }
}
