//! Application-state objects the realtime client writes into.
//!
//! - [`ConnectionStore`] - "is connected" flag for status display

pub mod connection;

pub use connection::ConnectionStore;
