//! Connection status sink trait.

use std::sync::Arc;

/// Receives the boolean "is connected" flag for display.
///
/// The client only writes to this; it never reads it back.
/// Called outside the client's internal lock, so an implementation may
/// query the client from inside `set_connected`.
pub trait ConnectionStatusSink: Send + Sync {
    fn set_connected(&self, connected: bool);
}

impl<T: ConnectionStatusSink + ?Sized> ConnectionStatusSink for Arc<T> {
    fn set_connected(&self, connected: bool) {
        (**self).set_connected(connected)
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatus;

impl ConnectionStatusSink for NoopStatus {
    fn set_connected(&self, _connected: bool) {}
}
