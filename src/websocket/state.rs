//! Observable connection lifecycle.

use std::fmt;
use std::time::Duration;

/// Connection state published on the client's watch channel.
///
/// ```text
/// Disconnected -> Connecting -> Connected
///      ^              |             |
///      |              v   (drop)    v
///      +------ ReconnectScheduled <-+
///                     |
///                     v  (cap reached)
///                 Exhausted
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport and no reconnect pending.
    #[default]
    Disconnected,
    /// A transport is being opened.
    Connecting,
    /// The transport is open and ready.
    Connected,
    /// The transport dropped; a reconnect fires after `delay`.
    ///
    /// `attempt` is 1-based: the first scheduled reconnect is attempt 1.
    ReconnectScheduled { attempt: u32, delay: Duration },
    /// The attempt cap was reached. Stays here until `connect()` or
    /// `reset_reconnect_attempts()` is called.
    Exhausted { attempts: u32 },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_reconnecting(&self) -> bool {
        matches!(self, ConnectionState::ReconnectScheduled { .. })
    }

    /// Terminal until an operator intervenes.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ConnectionState::Exhausted { .. })
    }

    /// Current reconnect attempt number, if one is scheduled.
    pub fn reconnect_attempt(&self) -> Option<u32> {
        match self {
            ConnectionState::ReconnectScheduled { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::ReconnectScheduled { attempt, delay } => {
                write!(f, "reconnecting (attempt {} in {}ms)", attempt, delay.as_millis())
            }
            ConnectionState::Exhausted { attempts } => {
                write!(f, "gave up after {} attempts", attempts)
            }
        }
    }
}
