//! # Service Facade
//!
//! Binds one record store to a resource name.
//!
//! Every operation takes the store's single mutex for its whole duration,
//! so no caller can observe a half-applied mutation. Successful mutations
//! yield a [`ChangeEvent`] and are handed to the optional [`ChangeSink`]
//! before the lock is released, which keeps notification order equal to
//! mutation order.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::errors::{ServiceError, ServiceResult};
use super::sink::ChangeSink;
use crate::realtime::{ChangeEvent, Operation};
use crate::store::{FindResult, Query, Record, RecordStore, StoreConfig, StoreResult};

/// Store plus the notification sequence, guarded together
struct ServiceState {
    store: RecordStore,
    sequence: u64,
}

/// A named resource backed by its own record store
pub struct Service {
    name: String,
    state: Mutex<ServiceState>,
    sink: Option<Arc<dyn ChangeSink>>,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Service {
    /// Create a service with an empty store
    pub fn new(name: impl Into<String>, config: StoreConfig) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ServiceState {
                store: RecordStore::new(config),
                sequence: 0,
            }),
            sink: None,
        }
    }

    /// Attach a post-mutation hook
    pub fn with_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, ServiceState>> {
        self.state
            .lock()
            .map_err(|_| ServiceError::Internal("Lock poisoned".to_string()))
    }

    /// Store configuration
    pub fn config(&self) -> ServiceResult<StoreConfig> {
        Ok(self.lock()?.store.config().clone())
    }

    /// Number of stored records
    pub fn len(&self) -> ServiceResult<usize> {
        Ok(self.lock()?.store.len())
    }

    pub fn find(&self, query: &Query) -> ServiceResult<FindResult> {
        Ok(self.lock()?.store.find(query))
    }

    pub fn get(&self, id: u64) -> ServiceResult<Record> {
        Ok(self.lock()?.store.get(id)?)
    }

    pub fn create(&self, body: Value) -> ServiceResult<ChangeEvent> {
        self.mutate(Operation::Created, |store| store.create(body))
    }

    pub fn update(&self, id: u64, body: Value) -> ServiceResult<ChangeEvent> {
        self.mutate(Operation::Updated, |store| store.update(id, body))
    }

    pub fn patch(&self, id: u64, body: Value) -> ServiceResult<ChangeEvent> {
        self.mutate(Operation::Patched, |store| store.patch(id, body))
    }

    pub fn remove(&self, id: u64) -> ServiceResult<ChangeEvent> {
        self.mutate(Operation::Removed, |store| store.remove(id))
    }

    /// Apply a mutation and publish its event under the same lock
    fn mutate<F>(&self, operation: Operation, f: F) -> ServiceResult<ChangeEvent>
    where
        F: FnOnce(&mut RecordStore) -> StoreResult<Record>,
    {
        let mut state = self.lock()?;
        let record = f(&mut state.store)?;

        state.sequence += 1;
        let event = ChangeEvent::new(self.name.clone(), operation, state.sequence, record);

        if let Some(sink) = &self.sink {
            sink.publish(&event);
        }

        Ok(event)
    }
}
