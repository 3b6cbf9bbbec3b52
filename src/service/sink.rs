//! Post-mutation hook.

use std::sync::Mutex;

use crate::realtime::ChangeEvent;

/// Receives every change event a service produces.
///
/// Called while the service's store lock is held, so implementations must
/// not block and must not call back into the service.
pub trait ChangeSink: Send + Sync {
    fn publish(&self, event: &ChangeEvent);
}

/// Sink that keeps every event, for tests and inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far, in publish order
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ChangeSink for RecordingSink {
    fn publish(&self, event: &ChangeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
