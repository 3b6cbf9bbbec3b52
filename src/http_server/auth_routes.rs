//! Auth HTTP Routes
//!
//! Mock login endpoint. Tokens it issues are not checked anywhere else.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    routing::post,
    Router,
};

use crate::auth::{AuthError, LoginRequest, LoginResponse, MockAuthConfig, MockAuthenticator};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::service::ErrorResponse;

/// Shared auth state
pub struct AuthState {
    pub authenticator: MockAuthenticator,
}

impl AuthState {
    pub fn new(config: MockAuthConfig) -> Self {
        Self {
            authenticator: MockAuthenticator::new(config),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new(MockAuthConfig::default())
    }
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .with_state(state)
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        let body = ErrorResponse {
            error: rejection.body_text(),
            code: StatusCode::BAD_REQUEST.as_u16(),
        };
        (StatusCode::BAD_REQUEST, Json(body))
    })?;

    match state.authenticator.login(&request) {
        Ok(response) => {
            log_event_with_fields(
                Event::LoginAccepted,
                &[("username", response.user.username.as_str())],
            );
            Ok(Json(response))
        }
        Err(e) => {
            Logger::warn(
                Event::LoginRejected.as_str(),
                &[("reason", e.to_string().as_str())],
            );
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
            Err((status, Json(ErrorResponse::from(e))))
        }
    }
}
