//! # Service Module
//!
//! Per-resource facades over record stores, and the registry that exposes
//! them by name to the HTTP layer.

pub mod errors;
pub mod registry;
pub mod service;
pub mod sink;

pub use errors::{ErrorResponse, ServiceError, ServiceResult};
pub use registry::{ResourceConfig, ServiceRegistry};
pub use service::Service;
pub use sink::{ChangeSink, RecordingSink};
