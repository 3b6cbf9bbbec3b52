//! Lifecycle and request events
//!
//! Every log line names one of these.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Resources registered
    ResourcesRegistered,
    /// Listening for requests
    Serving,
    /// Startup failed (FATAL)
    BootFailed,
    /// Shutdown complete
    ShutdownComplete,

    // Requests
    /// HTTP request finished
    RequestComplete,
    /// Request rejected with a server error
    RequestFailed,

    // Real-time
    /// WebSocket client connected
    ClientConnected,
    /// WebSocket client disconnected
    ClientDisconnected,
    /// WebSocket client fell behind and skipped events
    ClientLagged,
    /// WebSocket client sent something unusable
    ClientMessageRejected,

    // Auth
    /// Mock login accepted
    LoginAccepted,
    /// Mock login rejected
    LoginRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ResourcesRegistered => "RESOURCES_REGISTERED",
            Event::Serving => "SERVING",
            Event::BootFailed => "BOOT_FAILED",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestFailed => "REQUEST_FAILED",

            Event::ClientConnected => "CLIENT_CONNECTED",
            Event::ClientDisconnected => "CLIENT_DISCONNECTED",
            Event::ClientLagged => "CLIENT_LAGGED",
            Event::ClientMessageRejected => "CLIENT_MESSAGE_REJECTED",

            Event::LoginAccepted => "LOGIN_ACCEPTED",
            Event::LoginRejected => "LOGIN_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::BootStart.as_str(), "BOOT_BEGIN");
        assert_eq!(Event::ClientLagged.to_string(), "CLIENT_LAGGED");
    }

    #[test]
    fn test_only_boot_failure_is_fatal() {
        assert!(Event::BootFailed.is_fatal());
        assert!(!Event::RequestFailed.is_fatal());
    }
}
