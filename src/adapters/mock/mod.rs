//! Mock implementations for testing.
//!
//! Test doubles for every trait in [`crate::traits`], usable without a
//! network or a home directory.
//!
//! # Available Mocks
//!
//! - [`MockTransport`] - scripted connects, injectable frames and closes
//! - [`InMemoryTokens`] - swappable session token
//! - [`RecordingStatus`] - records the "is connected" flag history

pub mod credentials;
pub mod status;
pub mod transport;

pub use credentials::InMemoryTokens;
pub use status::RecordingStatus;
pub use transport::{MockSession, MockTransport};
