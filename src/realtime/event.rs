//! # Change Events
//!
//! Notifications produced by successful mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Record;

/// Kind of mutation applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// New record stored
    Created,
    /// Record body replaced
    Updated,
    /// Record fields merged
    Patched,
    /// Record deleted
    Removed,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Created => "created",
            Operation::Updated => "updated",
            Operation::Patched => "patched",
            Operation::Removed => "removed",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation applied to one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Resource name
    pub resource: String,

    /// What happened
    pub operation: Operation,

    /// Per-resource sequence number, starting at 1
    pub sequence: u64,

    /// Record after the mutation (the removed record for `removed`)
    pub record: Record,

    /// When the mutation was applied
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(resource: String, operation: Operation, sequence: u64, record: Record) -> Self {
        Self {
            resource,
            operation,
            sequence,
            record,
            timestamp: Utc::now(),
        }
    }

    /// Event name in `<resource> <operation>` form, e.g. `messages created`
    pub fn event_name(&self) -> String {
        format!("{} {}", self.resource, self.operation)
    }

    /// Serialize to the message sent over the socket
    pub fn to_wire_format(&self) -> Value {
        serde_json::json!({
            "type": "change",
            "event": self.event_name(),
            "resource": self.resource,
            "operation": self.operation,
            "sequence": self.sequence,
            "record": self.record,
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}
