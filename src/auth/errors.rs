//! # Auth Errors
//!
//! Error types for the mock login endpoint.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username or password wrong (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request did not carry both fields
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials(_) => 400,
            AuthError::InvalidCredentials => 401,
        }
    }
}
