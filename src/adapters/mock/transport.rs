//! Mock transport for testing.
//!
//! Every successful `connect` produces a [`MockSession`] that the test
//! picks up with [`MockTransport::next_session`] and uses to inject
//! frames, errors and closes, and to read what the client sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::traits::{Transport, TransportCommand, TransportEvent, TransportHandle};

/// Mock transport.
///
/// # Example
///
/// ```ignore
/// use storefront_realtime::adapters::mock::MockTransport;
///
/// let transport = MockTransport::new();
/// transport.fail_next(2);
///
/// client.connect();
/// // two failed attempts, then:
/// let session = transport.next_session().await;
/// session.push_text(r#"{"type":"notification"}"#);
/// session.close("server restart");
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

struct MockInner {
    sessions_tx: mpsc::UnboundedSender<MockSession>,
    sessions_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<MockSession>>,
    urls: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<TransportError>>,
    connect_delay: Mutex<Option<Duration>>,
    connect_count: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        let (sessions_tx, sessions_rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(MockInner {
                sessions_tx,
                sessions_rx: tokio::sync::Mutex::new(sessions_rx),
                urls: Mutex::new(Vec::new()),
                failures: Mutex::new(VecDeque::new()),
                connect_delay: Mutex::new(None),
                connect_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Make the next `count` connect attempts fail.
    pub fn fail_next(&self, count: usize) {
        let mut failures = self.inner.failures.lock().unwrap();
        for _ in 0..count {
            failures.push_back(TransportError::ConnectionFailed(
                "mock connection refused".to_string(),
            ));
        }
    }

    /// Make the next connect attempt fail with a specific error.
    pub fn fail_next_with(&self, err: TransportError) {
        self.inner.failures.lock().unwrap().push_back(err);
    }

    /// Delay every connect attempt (for timeout tests).
    pub fn set_connect_delay(&self, delay: Option<Duration>) {
        *self.inner.connect_delay.lock().unwrap() = delay;
    }

    /// Wait for the next successfully opened session.
    pub async fn next_session(&self) -> MockSession {
        self.inner
            .sessions_rx
            .lock()
            .await
            .recv()
            .await
            .expect("MockTransport keeps its own sender alive")
    }

    /// Take an already opened session without waiting.
    pub fn try_next_session(&self) -> Option<MockSession> {
        self.inner.sessions_rx.try_lock().ok()?.try_recv().ok()
    }

    /// Number of connect attempts so far, failed ones included.
    pub fn connect_count(&self) -> usize {
        self.inner.connect_count.load(Ordering::SeqCst)
    }

    /// URLs passed to connect, in order.
    pub fn urls(&self) -> Vec<String> {
        self.inner.urls.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self, url: &str) -> Result<TransportHandle, TransportError> {
        self.inner.connect_count.fetch_add(1, Ordering::SeqCst);
        self.inner.urls.lock().unwrap().push(url.to_string());

        let delay = *self.inner.connect_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.inner.failures.lock().unwrap().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }

        let (handle, commands_rx, events_tx) = TransportHandle::pair();
        let _ = self.inner.sessions_tx.send(MockSession {
            url: url.to_string(),
            events: events_tx,
            commands: commands_rx,
        });
        Ok(handle)
    }
}

/// Server side of one mock connection.
///
/// Dropping it ends the event stream, which the client sees as a close.
pub struct MockSession {
    pub url: String,
    events: mpsc::UnboundedSender<TransportEvent>,
    commands: mpsc::UnboundedReceiver<TransportCommand>,
}

impl MockSession {
    /// Deliver a raw text frame.
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Text(text.into()));
    }

    /// Deliver a JSON value as a text frame.
    pub fn push_json(&self, value: &serde_json::Value) {
        self.push_text(value.to_string());
    }

    /// Report a transport error (without closing).
    pub fn push_error(&self, message: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Error(message.into()));
    }

    /// Close from the server side.
    pub fn close(&self, reason: impl Into<String>) {
        let _ = self.events.send(TransportEvent::closed(reason));
    }

    pub fn close_with_code(&self, code: u16, reason: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Closed {
            code: Some(code),
            reason: reason.into(),
        });
    }

    /// Next command issued by the client, or None once it hung up.
    pub async fn next_command(&mut self) -> Option<TransportCommand> {
        self.commands.recv().await
    }

    /// Next frame the client sent, skipping other commands.
    pub async fn next_sent(&mut self) -> Option<String> {
        loop {
            match self.commands.recv().await? {
                TransportCommand::Send(text) => return Some(text),
                TransportCommand::Close => continue,
            }
        }
    }

    /// Commands already queued, without waiting.
    pub fn drain_commands(&mut self) -> Vec<TransportCommand> {
        let mut drained = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            drained.push(command);
        }
        drained
    }
}
