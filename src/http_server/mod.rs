//! # HTTP Server Module
//!
//! Axum server exposing every configured resource over REST, plus the
//! realtime WebSocket and a mock login.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/auth/login` - Mock login
//! - `/realtime/ws` - Change event stream
//! - `/realtime/stats` - Hub counters
//! - `/:resource`, `/:resource/:id` - CRUD over a resource

pub mod auth_routes;
pub mod config;
pub mod observability_routes;
pub mod realtime_routes;
pub mod resource_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
