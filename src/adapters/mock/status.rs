//! Recording status sink for testing.

use std::sync::Mutex;

use crate::traits::ConnectionStatusSink;

/// Records every `set_connected` call.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    history: Mutex<Vec<bool>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values written, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.history.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.history.lock().unwrap().last().copied()
    }

    pub fn is_connected(&self) -> bool {
        self.last().unwrap_or(false)
    }
}

impl ConnectionStatusSink for RecordingStatus {
    fn set_connected(&self, connected: bool) {
        self.history.lock().unwrap().push(connected);
    }
}
