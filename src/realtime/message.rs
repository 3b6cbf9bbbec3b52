//! Socket message shapes
//!
//! Change events are sent as [`ChangeEvent::to_wire_format`]; everything
//! else the server says is a [`ServerMessage`].
//!
//! [`ChangeEvent::to_wire_format`]: super::ChangeEvent::to_wire_format

use serde::{Deserialize, Serialize};

use super::errors::{RealtimeError, RealtimeResult};

/// Message from client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat
    Ping,
}

impl ClientMessage {
    /// Parse a text frame
    pub fn parse(text: &str) -> RealtimeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| RealtimeError::InvalidMessage(e.to_string()))?;

        let msg_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| RealtimeError::InvalidMessage("missing \"type\"".to_string()))?
            .to_string();

        serde_json::from_value(value).map_err(|_| RealtimeError::UnknownMessageType(msg_type))
    }
}

/// Message from server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the upgrade
    Connected {
        connection_id: String,
        resources: Vec<String>,
    },

    /// Heartbeat reply
    Pong,

    /// Something the client sent was rejected, or the client lagged
    Error { message: String },
}

impl From<&RealtimeError> for ServerMessage {
    fn from(err: &RealtimeError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}
