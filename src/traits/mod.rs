//! Trait abstractions for dependency injection and testability.
//!
//! The realtime client talks to three collaborators, each behind a trait
//! so tests can swap in doubles from [`crate::adapters::mock`]:
//!
//! - [`Transport`] - opens full-duplex text connections
//! - [`TokenProvider`] - yields the current session token, if any
//! - [`ConnectionStatusSink`] - receives the "is connected" flag for display

pub mod credentials;
pub mod status;
pub mod transport;

pub use credentials::TokenProvider;
pub use status::{ConnectionStatusSink, NoopStatus};
pub use transport::{Transport, TransportCommand, TransportEvent, TransportHandle};
