//! # Change Hub
//!
//! Fans change events out to every connected real-time client.
//!
//! Backed by a bounded `tokio::sync::broadcast` channel: publishing never
//! blocks, and a client that falls more than `capacity` events behind skips
//! the ones it missed.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::broadcast;

use super::event::ChangeEvent;
use crate::service::ChangeSink;

/// Default number of buffered events per client
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Snapshot of hub counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connected_clients: usize,
    pub events_published: u64,
}

/// Broadcast point for change events
#[derive(Debug)]
pub struct ChangeHub {
    sender: broadcast::Sender<ChangeEvent>,
    clients: AtomicUsize,
    published: AtomicU64,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ChangeHub {
    /// Create a hub buffering up to `capacity` events per client.
    ///
    /// `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            clients: AtomicUsize::new(0),
            published: AtomicU64::new(0),
        }
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Register a connected client; the guard deregisters it on drop
    pub fn connect(&self) -> ClientGuard<'_> {
        self.clients.fetch_add(1, Ordering::SeqCst);
        ClientGuard { hub: self }
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            connected_clients: self.clients.load(Ordering::SeqCst),
            events_published: self.published.load(Ordering::SeqCst),
        }
    }
}

impl ChangeSink for ChangeHub {
    fn publish(&self, event: &ChangeEvent) {
        self.published.fetch_add(1, Ordering::SeqCst);
        // No receivers is not an error: nobody is listening yet
        let _ = self.sender.send(event.clone());
    }
}

/// Keeps a client counted as connected while alive
#[derive(Debug)]
pub struct ClientGuard<'a> {
    hub: &'a ChangeHub,
}

impl Drop for ClientGuard<'_> {
    fn drop(&mut self) {
        self.hub.clients.fetch_sub(1, Ordering::SeqCst);
    }
}
