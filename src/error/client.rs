//! Errors returned by the public client API.

use thiserror::Error;

use super::transport::TransportError;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error type for [`RealtimeClient`](crate::websocket::RealtimeClient) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No open transport to send on. Messages are never queued.
    #[error("Not connected: message dropped")]
    NotConnected,

    /// The outgoing payload could not be encoded as JSON.
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The transport accepted the connection but refused the frame.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Error surfaced from the transport seam.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
