//! Observability HTTP Routes
//!
//! Liveness check and request logging middleware.

use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::observability::{log_event_with_fields, Event, Logger};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check route at root /health
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Log one line per request once the response is ready
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let status_text = status.as_u16().to_string();
    let elapsed_ms = started.elapsed().as_millis().to_string();
    let fields = [
        ("method", method.as_str()),
        ("path", path.as_str()),
        ("status", status_text.as_str()),
        ("duration_ms", elapsed_ms.as_str()),
    ];

    if status.is_server_error() {
        Logger::error(Event::RequestFailed.as_str(), &fields);
    } else if status.is_client_error() {
        Logger::warn(Event::RequestFailed.as_str(), &fields);
    } else {
        log_event_with_fields(Event::RequestComplete, &fields);
    }

    response
}
