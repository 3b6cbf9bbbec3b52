//! # Real-Time Errors
//!
//! Error types for the real-time module.

use thiserror::Error;

/// Result type for real-time operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Real-time errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RealtimeError {
    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Invalid message format
    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    /// Client message type not understood
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    /// Client fell behind and missed events
    #[error("Client lagged, {0} events skipped")]
    Lagged(u64),
}

impl RealtimeError {
    /// Returns the close code for WebSocket
    pub fn close_code(&self) -> u16 {
        match self {
            RealtimeError::ConnectionClosed => 1000,
            RealtimeError::InvalidMessage(_) => 1003,
            RealtimeError::UnknownMessageType(_) => 1003,
            RealtimeError::Lagged(_) => 1008,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_close_codes() {
        assert_eq!(RealtimeError::ConnectionClosed.close_code(), 1000);
        assert_eq!(RealtimeError::InvalidMessage("x".into()).close_code(), 1003);
        assert_eq!(RealtimeError::Lagged(4).to_string(), "Client lagged, 4 events skipped");
    }
}
