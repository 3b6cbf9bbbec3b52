//! Service registry
//!
//! Resolves resource names to their services.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{ServiceError, ServiceResult};
use super::service::Service;
use super::sink::ChangeSink;
use crate::store::StoreConfig;

/// One exposed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Path segment the resource is served under
    pub name: String,

    #[serde(flatten)]
    pub store: StoreConfig,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: StoreConfig::default(),
        }
    }
}

/// Name → service lookup
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one service per resource, all reporting to the same sink
    pub fn from_resources(
        resources: &[ResourceConfig],
        sink: Option<Arc<dyn ChangeSink>>,
    ) -> ServiceResult<Self> {
        let mut registry = Self::new();

        for resource in resources {
            let mut service = Service::new(resource.name.clone(), resource.store.clone());
            if let Some(sink) = &sink {
                service = service.with_sink(Arc::clone(sink));
            }
            registry.register(service)?;
        }

        Ok(registry)
    }

    /// Add a service; names must be unique
    pub fn register(&mut self, service: Service) -> ServiceResult<Arc<Service>> {
        if self.services.contains_key(service.name()) {
            return Err(ServiceError::Internal(format!(
                "Resource registered twice: {}",
                service.name()
            )));
        }

        let service = Arc::new(service);
        self.services
            .insert(service.name().to_string(), Arc::clone(&service));
        Ok(service)
    }

    pub fn get(&self, name: &str) -> ServiceResult<Arc<Service>> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownResource(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }
}
