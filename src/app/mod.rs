//! Application-level wiring of the realtime client.

pub mod context;

pub use context::RealtimeContext;
