//! Resource HTTP Routes
//!
//! REST endpoints over registered services:
//!
//! | Method   | Path               | Operation | Success |
//! |----------|--------------------|-----------|---------|
//! | `GET`    | `/:resource`       | find      | 200     |
//! | `POST`   | `/:resource`       | create    | 201     |
//! | `GET`    | `/:resource/:id`   | get       | 200     |
//! | `PUT`    | `/:resource/:id`   | update    | 200     |
//! | `PATCH`  | `/:resource/:id`   | patch     | 200     |
//! | `DELETE` | `/:resource/:id`   | remove    | 200     |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::service::{ServiceError, ServiceRegistry, ServiceResult};
use crate::store::{self, FindResult, Record, StoreError};

// ==================
// Shared State
// ==================

/// Resource state shared across handlers
pub struct ResourceState {
    pub registry: Arc<ServiceRegistry>,
}

impl ResourceState {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

type SharedState = Arc<ResourceState>;

/// Create resource routes
pub fn resource_routes(state: SharedState) -> Router {
    Router::new()
        .route("/:resource", get(find_handler).post(create_handler))
        .route(
            "/:resource/:id",
            get(get_handler)
                .put(update_handler)
                .patch(patch_handler)
                .delete(remove_handler),
        )
        .with_state(state)
}

/// Parse a path identifier; anything non-numeric cannot name a record
fn parse_id(raw: &str) -> ServiceResult<u64> {
    raw.parse()
        .map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

/// Unwrap a JSON body, reporting parse failures as invalid records
fn body(payload: Result<Json<Value>, JsonRejection>) -> ServiceResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| StoreError::InvalidRecord(rejection.body_text()).into())
}

// ==================
// Handlers
// ==================

async fn find_handler(
    State(state): State<SharedState>,
    Path(resource): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ServiceResult<Json<FindResult>> {
    let service = state.registry.get(&resource)?;
    let query = store::Query::from_pairs(params)?;

    Ok(Json(service.find(&query)?))
}

async fn get_handler(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
) -> ServiceResult<Json<Record>> {
    let service = state.registry.get(&resource)?;
    let id = parse_id(&id)?;

    Ok(Json(service.get(id)?))
}

async fn create_handler(
    State(state): State<SharedState>,
    Path(resource): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Record>)> {
    let service = state.registry.get(&resource)?;
    let event = service.create(body(payload)?)?;

    Ok((StatusCode::CREATED, Json(event.record)))
}

async fn update_handler(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServiceResult<Json<Record>> {
    let service = state.registry.get(&resource)?;
    let id = parse_id(&id)?;
    let event = service.update(id, body(payload)?)?;

    Ok(Json(event.record))
}

async fn patch_handler(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServiceResult<Json<Record>> {
    let service = state.registry.get(&resource)?;
    let id = parse_id(&id)?;
    let event = service.patch(id, body(payload)?)?;

    Ok(Json(event.record))
}

async fn remove_handler(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
) -> ServiceResult<Json<Record>> {
    let service = state.registry.get(&resource)?;
    let id = parse_id(&id)?;
    let event = service.remove(id)?;

    Ok(Json(event.record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ServiceError::InvalidId(_))));
        assert!(matches!(parse_id("-1"), Err(ServiceError::InvalidId(_))));
    }

    #[test]
    fn test_router_builds() {
        let state = Arc::new(ResourceState::new(Arc::new(ServiceRegistry::new())));
        let _router = resource_routes(state);
    }
}
