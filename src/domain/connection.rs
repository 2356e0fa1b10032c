//! Connection status store.
//!
//! [`ConnectionStore`] is the application-state side of the realtime
//! client: the client writes the "is connected" flag into it, and UI or
//! monitoring code reads it back (or watches it) without ever touching
//! the client itself.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::traits::ConnectionStatusSink;

/// Observable "is connected" flag.
#[derive(Debug)]
pub struct ConnectionStore {
    connected: AtomicBool,
    tx: watch::Sender<bool>,
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStore {
    /// Create a store in the disconnected state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            connected: AtomicBool::new(false),
            tx,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Watch receiver notified whenever the flag changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Label for status bars.
    pub fn label(&self) -> &'static str {
        if self.is_connected() {
            "online"
        } else {
            "offline"
        }
    }
}

impl ConnectionStatusSink for ConnectionStore {
    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        // Only wake watchers on an actual change
        self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
    }
}
