//! Common test utilities for integration tests.
//!
//! Builds clients wired to in-memory doubles so tests can script the
//! server side of the connection.
//!
//! # Example
//!
//! ```ignore
//! let harness = TestHarness::new();
//! harness.client.connect();
//! let session = harness.transport.next_session().await;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use storefront_realtime::config::ClientConfig;
use storefront_realtime::websocket::{ConnectionState, RealtimeClient};

/// Config pointing at a fake host with the default reconnect schedule.
pub fn test_config() -> ClientConfig {
    ClientConfig::new()
        .with_api_base_url("http://dashboard.test")
        .with_base_delay(Duration::from_millis(5000))
        .with_max_reconnect_attempts(5)
}

/// A client plus handles on every double it was built with.
pub struct TestHarness {
    pub client: RealtimeClient,
    pub transport: MockTransport,
    pub status: Arc<RecordingStatus>,
    pub tokens: Arc<InMemoryTokens>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = MockTransport::new();
        let status = Arc::new(RecordingStatus::new());
        let tokens = Arc::new(InMemoryTokens::new());
        let client = RealtimeClient::builder(config)
            .transport(Arc::new(transport.clone()))
            .status_sink(status.clone())
            .token_provider(tokens.clone())
            .build();
        Self {
            client,
            transport,
            status,
            tokens,
        }
    }

    /// Connect and wait until the transport reports open.
    pub async fn connect_and_open(&self) -> MockSession {
        self.client.connect();
        let session = self.transport.next_session().await;
        wait_for_state(&self.client, |s| s.is_connected()).await;
        session
    }
}

/// Wait until the client's state satisfies `predicate`.
pub async fn wait_for_state<P>(client: &RealtimeClient, predicate: P) -> ConnectionState
where
    P: FnMut(&ConnectionState) -> bool,
{
    let mut rx = client.state_receiver();
    let state = rx
        .wait_for(predicate)
        .await
        .expect("client dropped while waiting for state")
        .clone();
    state
}
