//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `storefront_realtime::adapters::mock` and adds a listener that records
//! what it was given.

#![allow(dead_code)]

pub use storefront_realtime::adapters::mock::{
    InMemoryTokens, MockSession, MockTransport, RecordingStatus,
};

use std::sync::{Arc, Mutex};

use serde_json::Value;

/// Listener that records every message it receives.
#[derive(Clone, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<Value>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure suitable for `RealtimeClient::subscribe`.
    pub fn listener(&self) -> impl Fn(&Value) + Send + Sync + 'static {
        let messages = Arc::clone(&self.messages);
        move |value| messages.lock().unwrap().push(value.clone())
    }

    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}
