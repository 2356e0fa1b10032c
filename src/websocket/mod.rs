//! Resilient real-time client for the dashboard's chat/notification socket.
//!
//! This module provides a WebSocket client with automatic reconnection
//! (capped exponential backoff), listener fan-out that survives reconnects,
//! and an observable connection state.

pub mod backoff;
pub mod client;
pub mod endpoint;
pub mod listeners;
pub mod messages;
pub mod state;

pub use backoff::{Backoff, ReconnectPolicy};
pub use client::{RealtimeClient, RealtimeClientBuilder};
pub use endpoint::build_endpoint;
pub use listeners::{Listener, ListenerId, ListenerRegistry, Subscription};
pub use messages::{ChatEvent, ChatMessage, Notification, OutgoingChat, TypingIndicator};
pub use state::ConnectionState;
