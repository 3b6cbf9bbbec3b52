//! # Real-Time Module
//!
//! Every successful mutation is broadcast to every connected WebSocket
//! client. Events for one resource arrive in the order the mutations were
//! applied; there is no ordering guarantee across resources.
//!
//! - **Event**: what changed ([`ChangeEvent`])
//! - **Hub**: bounded fan-out channel ([`ChangeHub`])
//! - **Message**: socket message shapes

pub mod errors;
pub mod event;
pub mod hub;
pub mod message;

pub use errors::{RealtimeError, RealtimeResult};
pub use event::{ChangeEvent, Operation};
pub use hub::{ChangeHub, ClientGuard, HubStats, DEFAULT_CHANNEL_CAPACITY};
pub use message::{ClientMessage, ServerMessage};
