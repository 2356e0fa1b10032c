//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`TungsteniteTransport`] - WebSocket transport using tokio-tungstenite
//! - [`FileTokenProvider`] - session token from the credentials file
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockTransport`] - scripted transport with frame injection
//! - [`mock::InMemoryTokens`] - in-memory token
//! - [`mock::RecordingStatus`] - status flag recorder

pub mod file_credentials;
pub mod mock;
pub mod tungstenite_ws;

pub use file_credentials::FileTokenProvider;
pub use mock::{InMemoryTokens, MockTransport, RecordingStatus};
pub use tungstenite_ws::TungsteniteTransport;
