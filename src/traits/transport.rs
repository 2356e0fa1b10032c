//! Transport trait abstraction.
//!
//! A transport opens one full-duplex text connection and exposes it as a
//! pair of channels, mirroring the `open`/`message`/`error`/`close`
//! callbacks of a browser WebSocket:
//!
//! - the client pushes [`TransportCommand`]s into `commands`
//! - the transport pushes [`TransportEvent`]s into `events`
//!
//! Returning `Ok` from [`Transport::connect`] is the "open" event. The
//! events stream must end with exactly one [`TransportEvent::Closed`]
//! (or simply end, which the client treats the same way).

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;

/// Events reported by an open transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Text(String),
    /// The transport hit an error. A `Closed` event follows.
    Error(String),
    /// The transport closed, for any reason.
    Closed { code: Option<u16>, reason: String },
}

impl TransportEvent {
    pub fn closed(reason: impl Into<String>) -> Self {
        TransportEvent::Closed {
            code: None,
            reason: reason.into(),
        }
    }
}

/// Commands the client issues to an open transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    /// Send one text frame.
    Send(String),
    /// Close the connection.
    Close,
}

/// Channel pair for one open connection.
#[derive(Debug)]
pub struct TransportHandle {
    pub commands: mpsc::UnboundedSender<TransportCommand>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl TransportHandle {
    /// Create a handle plus the transport-side ends of its channels.
    pub fn pair() -> (
        Self,
        mpsc::UnboundedReceiver<TransportCommand>,
        mpsc::UnboundedSender<TransportEvent>,
    ) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                commands: commands_tx,
                events: events_rx,
            },
            commands_rx,
            events_tx,
        )
    }

    /// Whether the transport side is still accepting commands.
    pub fn is_ready(&self) -> bool {
        !self.commands.is_closed()
    }
}

/// Trait for opening connections.
///
/// # Example
///
/// ```ignore
/// use storefront_realtime::traits::{Transport, TransportCommand};
///
/// async fn ping<T: Transport>(transport: &T) -> Result<(), TransportError> {
///     let handle = transport.connect("ws://localhost:8000/api/ws/chat").await?;
///     let _ = handle.commands.send(TransportCommand::Send("{}".to_string()));
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a connection to `url`.
    ///
    /// # Returns
    /// The channel pair once the connection is open, or the reason it
    /// could not be opened.
    async fn connect(&self, url: &str) -> Result<TransportHandle, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_pair_wiring() {
        let (mut handle, mut commands_rx, events_tx) = TransportHandle::pair();
        assert!(handle.is_ready());

        handle
            .commands
            .send(TransportCommand::Send("hi".to_string()))
            .unwrap();
        assert_eq!(
            commands_rx.try_recv().unwrap(),
            TransportCommand::Send("hi".to_string())
        );

        events_tx.send(TransportEvent::closed("bye")).unwrap();
        assert_eq!(
            handle.events.try_recv().unwrap(),
            TransportEvent::Closed {
                code: None,
                reason: "bye".to_string()
            }
        );

        drop(commands_rx);
        assert!(!handle.is_ready());
    }
}
