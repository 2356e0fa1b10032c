//! Transport-level error types.

use std::fmt;

/// Errors produced by a [`Transport`](crate::traits::Transport) implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The connection could not be established.
    ConnectionFailed(String),
    /// The connection attempt exceeded the configured timeout.
    Timeout(u64),
    /// The transport is already closed.
    Closed,
    /// Anything else the underlying library reports.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Timeout(secs) => write!(f, "Connection timeout after {}s", secs),
            TransportError::Closed => write!(f, "Connection closed"),
            TransportError::Other(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Closed,
            WsError::Io(e) => TransportError::ConnectionFailed(e.to_string()),
            WsError::Url(e) => TransportError::ConnectionFailed(e.to_string()),
            WsError::Http(resp) => {
                TransportError::ConnectionFailed(format!("HTTP {}", resp.status()))
            }
            other => TransportError::Other(other.to_string()),
        }
    }
}
