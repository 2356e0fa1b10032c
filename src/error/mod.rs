//! Error types for the realtime client.
//!
//! Two layers:
//!
//! - [`TransportError`] - raised at the transport seam (connect, close, timeout)
//! - [`ClientError`] - returned by the public client API
//!
//! Nothing in the client panics or throws across the API for expected
//! failures. Malformed frames and listener panics are logged and absorbed;
//! only [`RealtimeClient::send_message`](crate::websocket::RealtimeClient::send_message)
//! hands an error back, and callers are free to ignore it.

mod client;
mod transport;

pub use client::{ClientError, ClientResult};
pub use transport::TransportError;
