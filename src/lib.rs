//! pulse_api - demo REST + realtime backend over in-memory resources
//!
//! Layers, leaf first:
//! - [`store`]: record collections with filtering, sorting and pagination
//! - [`service`]: one locked store per named resource, emitting change events
//! - [`realtime`]: fan-out of change events to WebSocket clients
//! - [`http_server`]: axum routes over all of the above

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod realtime;
pub mod service;
pub mod store;
