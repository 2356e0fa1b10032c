use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, ReentrantMutex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::backoff::Backoff;
use super::endpoint::{build_endpoint, redact_token};
use super::listeners::{ListenerRegistry, Subscription};
use super::messages::ChatEvent;
use super::state::ConnectionState;
use crate::adapters::TungsteniteTransport;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, TransportError};
use crate::traits::{
    ConnectionStatusSink, NoopStatus, TokenProvider, Transport, TransportCommand, TransportEvent,
};

/// Resilient client for the dashboard's real-time channel.
///
/// Holds at most one live transport, reconnects after unexpected drops
/// with capped exponential backoff, and fans every decoded message out to
/// all registered listeners. Listeners survive reconnects.
///
/// Cloning is cheap and every clone drives the same connection. Dropping
/// the last clone cancels the pending reconnect and closes the transport.
/// All methods must be called from within a Tokio runtime.
///
/// # Example
///
/// ```ignore
/// use storefront_realtime::config::ClientConfig;
/// use storefront_realtime::websocket::RealtimeClient;
///
/// let client = RealtimeClient::builder(ClientConfig::from_env()).build();
/// let sub = client.subscribe(|msg| println!("{}", msg));
/// client.connect();
/// // ...
/// sub.unsubscribe();
/// client.disconnect();
/// ```
#[derive(Clone)]
pub struct RealtimeClient {
    inner: Arc<Inner>,
}

/// Builder for [`RealtimeClient`].
pub struct RealtimeClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    tokens: Arc<dyn TokenProvider>,
    status: Arc<dyn ConnectionStatusSink>,
}

impl RealtimeClientBuilder {
    /// Use a specific transport (defaults to tokio-tungstenite).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Source of the session token appended to the endpoint URL.
    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Receiver of the boolean "is connected" flag.
    pub fn status_sink(mut self, status: Arc<dyn ConnectionStatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> RealtimeClient {
        let (broadcast_tx, _) = broadcast::channel(self.config.broadcast_capacity.max(1));
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let backoff = Backoff::new(self.config.reconnect_policy());
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(TungsteniteTransport::new()));

        RealtimeClient {
            inner: Arc::new(Inner {
                config: self.config,
                transport,
                tokens: self.tokens,
                status: self.status,
                listeners: ListenerRegistry::new(),
                broadcast_tx,
                state_tx,
                status_value: AtomicBool::new(false),
                status_order: ReentrantMutex::new(()),
                shared: Mutex::new(Shared {
                    connection: None,
                    manually_closed: false,
                    backoff,
                    reconnect_timer: None,
                    generation: 0,
                    next_timer_id: 0,
                }),
            }),
        }
    }
}

struct Inner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    status: Arc<dyn ConnectionStatusSink>,
    listeners: ListenerRegistry,
    broadcast_tx: broadcast::Sender<Value>,
    state_tx: watch::Sender<ConnectionState>,
    /// Latest "is connected" value, written under `shared`.
    status_value: AtomicBool,
    /// Serializes sink calls made after `shared` is released. Reentrant
    /// so a sink may call back into the client.
    status_order: ReentrantMutex<()>,
    shared: Mutex<Shared>,
}

/// Everything the connect/disconnect/timer paths can race on.
struct Shared {
    connection: Option<Connection>,
    manually_closed: bool,
    backoff: Backoff,
    reconnect_timer: Option<ReconnectTimer>,
    /// Bumped on every open attempt; events from older generations are ignored.
    generation: u64,
    next_timer_id: u64,
}

struct Connection {
    generation: u64,
    /// None while the transport is still opening.
    commands: Option<mpsc::UnboundedSender<TransportCommand>>,
    task: JoinHandle<()>,
}

struct ReconnectTimer {
    id: u64,
    attempt: u32,
    delay: Duration,
    handle: JoinHandle<()>,
}

impl RealtimeClient {
    pub fn builder(config: ClientConfig) -> RealtimeClientBuilder {
        RealtimeClientBuilder {
            config,
            transport: None,
            tokens: Arc::new(()),
            status: Arc::new(NoopStatus),
        }
    }

    /// Client over tokio-tungstenite with no token and no status sink.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder(config).build()
    }

    /// Open the connection. No-op if one is already open or opening.
    pub fn connect(&self) {
        let url = self.inner.endpoint_url();
        let mut shared = self.inner.shared.lock();
        if shared.connection.is_some() {
            debug!("connect() ignored, connection already active");
            return;
        }
        shared.manually_closed = false;
        self.inner.open_connection(&mut shared, url);
    }

    /// Close the connection and suppress automatic reconnects.
    ///
    /// Resets the attempt counter and cancels any pending reconnect.
    /// Safe to call when already disconnected. Frames decoded before the
    /// call are still dispatched; a frame whose dispatch is already under
    /// way on another thread may land just after it returns.
    pub fn disconnect(&self) {
        let mut shared = self.inner.shared.lock();
        shared.manually_closed = true;
        shared.backoff.reset();
        cancel_timer(&mut shared);

        if let Some(connection) = shared.connection.take() {
            match connection.commands {
                Some(commands) => {
                    let _ = commands.send(TransportCommand::Close);
                }
                None => connection.task.abort(),
            }
            info!("Disconnected from realtime channel");
        }

        self.inner.publish(ConnectionState::Disconnected);
        self.inner.report_status(shared, false);
    }

    /// Register a listener for every decoded incoming message.
    ///
    /// Each call is an independent registration; the returned
    /// [`Subscription`] removes exactly this one.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(listener)
    }

    /// Register a listener for typed chat events.
    ///
    /// Messages that do not decode as a [`ChatEvent`] are skipped for this
    /// listener only.
    pub fn subscribe_events<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ChatEvent) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .subscribe(move |value| match ChatEvent::deserialize(value) {
                Ok(event) => listener(event),
                Err(e) => debug!("Skipping message that is not a chat event: {}", e),
            })
    }

    /// Send a payload as one JSON text frame.
    ///
    /// Never queues: without an open, ready transport the message is
    /// dropped, logged, and [`ClientError::NotConnected`] is returned.
    /// Connection state is never changed by this call.
    pub fn send_message<T>(&self, message: &T) -> ClientResult<()>
    where
        T: Serialize + ?Sized,
    {
        let commands = {
            let shared = self.inner.shared.lock();
            shared
                .connection
                .as_ref()
                .and_then(|c| c.commands.clone())
        };

        let commands = match commands {
            Some(tx) if !tx.is_closed() => tx,
            _ => {
                error!("Cannot send message, realtime channel is not connected");
                return Err(ClientError::NotConnected);
            }
        };

        let text = serde_json::to_string(message).map_err(|e| {
            error!("Failed to serialize outgoing message: {}", e);
            ClientError::from(e)
        })?;
        debug!("Sending message: {}", text);

        commands.send(TransportCommand::Send(text)).map_err(|e| {
            error!("Failed to send message: {}", e);
            ClientError::SendFailed(e.to_string())
        })
    }

    /// Zero the attempt counter without touching the transport.
    ///
    /// Clears the [`ConnectionState::Exhausted`] state so a following
    /// `connect()` gets the full backoff schedule again.
    pub fn reset_reconnect_attempts(&self) {
        let mut shared = self.inner.shared.lock();
        shared.backoff.reset();
        if self.inner.state_tx.borrow().is_exhausted() {
            self.inner.publish(ConnectionState::Disconnected);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state_tx.borrow().clone()
    }

    /// Watch receiver for lifecycle changes.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Whether a transport is open and ready to send.
    pub fn is_connected(&self) -> bool {
        let shared = self.inner.shared.lock();
        shared
            .connection
            .as_ref()
            .and_then(|c| c.commands.as_ref())
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }

    /// Reconnects scheduled since the last successful open or reset.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.shared.lock().backoff.attempts()
    }

    pub fn is_manually_closed(&self) -> bool {
        self.inner.shared.lock().manually_closed
    }

    pub fn has_pending_reconnect(&self) -> bool {
        self.inner.shared.lock().reconnect_timer.is_some()
    }

    /// Broadcast receiver of decoded messages, for async consumers.
    ///
    /// Slow receivers lag and lose messages; they never block dispatch.
    pub fn receiver(&self) -> broadcast::Receiver<Value> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// URL the next connection attempt would use.
    pub fn endpoint_url(&self) -> String {
        self.inner.endpoint_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("state", &self.state())
            .field("listeners", &self.subscriber_count())
            .finish()
    }
}

impl Inner {
    fn endpoint_url(&self) -> String {
        let token = self.tokens.current_token();
        build_endpoint(
            &self.config.api_base_url,
            &self.config.ws_path,
            token.as_deref(),
        )
    }

    fn publish(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }

    /// Record the flag, release `shared`, then tell the sink.
    ///
    /// The sink never runs under the client lock, so it may read the
    /// client back. It is handed the latest recorded value, so the last
    /// call it sees always matches the last state change.
    fn report_status(&self, shared: MutexGuard<'_, Shared>, connected: bool) {
        self.status_value.store(connected, Ordering::SeqCst);
        drop(shared);
        let _order = self.status_order.lock();
        self.status
            .set_connected(self.status_value.load(Ordering::SeqCst));
    }

    fn is_current(&self, shared: &Shared, generation: u64) -> bool {
        shared
            .connection
            .as_ref()
            .map(|c| c.generation == generation)
            .unwrap_or(false)
    }

    /// Start a connection attempt. Caller has checked no connection exists.
    fn open_connection(self: &Arc<Self>, shared: &mut Shared, url: String) {
        shared.generation += 1;
        let generation = shared.generation;
        info!("Connecting to {} (generation {})", redact_token(&url), generation);

        self.publish(ConnectionState::Connecting);

        let task = tokio::spawn(run_connection(
            Arc::downgrade(self),
            Arc::clone(&self.transport),
            url,
            self.config.connect_timeout,
            generation,
        ));

        shared.connection = Some(Connection {
            generation,
            commands: None,
            task,
        });
    }

    /// Transport opened. Returns false if this attempt was superseded.
    fn handle_open(
        &self,
        generation: u64,
        commands: mpsc::UnboundedSender<TransportCommand>,
    ) -> bool {
        let mut shared = self.shared.lock();
        match shared.connection.as_mut() {
            Some(connection) if connection.generation == generation => {
                connection.commands = Some(commands);
            }
            _ => {
                debug!("Discarding superseded connection (generation {})", generation);
                return false;
            }
        }

        shared.backoff.reset();
        cancel_timer(&mut shared);
        self.publish(ConnectionState::Connected);
        info!("Realtime channel connected (generation {})", generation);
        self.report_status(shared, true);
        true
    }

    fn handle_text(&self, generation: u64, text: &str) {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Dropping malformed message: {} - {}", e, text);
                return;
            }
        };

        // Checked right before dispatch; listeners run without the lock
        if !self.is_current(&self.shared.lock(), generation) {
            debug!("Ignoring frame from superseded connection");
            return;
        }

        debug!("Received message: {}", value);
        let failures = self.listeners.dispatch(&value);
        if failures > 0 {
            warn!("{} listener(s) failed while handling message", failures);
        }
        // No receivers is fine
        let _ = self.broadcast_tx.send(value);
    }

    fn handle_error(&self, generation: u64, message: &str) {
        let shared = self.shared.lock();
        if !self.is_current(&shared, generation) {
            return;
        }
        warn!("Realtime transport error: {}", message);
        self.report_status(shared, false);
    }

    fn handle_close(self: &Arc<Self>, generation: u64, code: Option<u16>, reason: &str) {
        let mut shared = self.shared.lock();
        if !self.is_current(&shared, generation) {
            debug!("Ignoring close from superseded connection (generation {})", generation);
            return;
        }

        info!("Realtime channel closed (code {:?}): {}", code, reason);
        shared.connection = None;

        if shared.manually_closed {
            self.publish(ConnectionState::Disconnected);
        } else {
            self.schedule_reconnect(&mut shared);
        }
        self.report_status(shared, false);
    }

    fn schedule_reconnect(self: &Arc<Self>, shared: &mut Shared) {
        if let Some(timer) = shared.reconnect_timer.as_ref() {
            // A manual open failed while the timer was pending: back to waiting
            debug!("Reconnect {} already scheduled", timer.id);
            self.publish(ConnectionState::ReconnectScheduled {
                attempt: timer.attempt,
                delay: timer.delay,
            });
            return;
        }

        let delay = match shared.backoff.next_delay() {
            Some(delay) => delay,
            None => {
                let attempts = shared.backoff.attempts();
                error!(
                    "Failed to reconnect after {} attempts, giving up until reconnected manually",
                    attempts
                );
                self.publish(ConnectionState::Exhausted { attempts });
                return;
            }
        };
        let attempt = shared.backoff.attempts();
        info!(
            "Reconnection attempt {} of {} in {}ms",
            attempt,
            shared.backoff.policy().max_attempts(),
            delay.as_millis()
        );

        shared.next_timer_id += 1;
        let id = shared.next_timer_id;
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_reconnect(id);
            }
        });

        shared.reconnect_timer = Some(ReconnectTimer {
            id,
            attempt,
            delay,
            handle,
        });
        self.publish(ConnectionState::ReconnectScheduled { attempt, delay });
    }

    fn fire_reconnect(self: &Arc<Self>, id: u64) {
        let url = self.endpoint_url();
        let mut shared = self.shared.lock();
        match shared.reconnect_timer.as_ref() {
            Some(timer) if timer.id == id => {}
            _ => {
                debug!("Stale reconnect timer {} fired, ignoring", id);
                return;
            }
        }
        shared.reconnect_timer = None;

        if shared.connection.is_some() {
            debug!("Reconnect timer fired while a connection is active");
            return;
        }
        shared.manually_closed = false;
        self.open_connection(&mut shared, url);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let shared = self.shared.get_mut();
        if let Some(timer) = shared.reconnect_timer.take() {
            timer.handle.abort();
        }
        if let Some(connection) = shared.connection.take() {
            if let Some(commands) = connection.commands {
                let _ = commands.send(TransportCommand::Close);
            }
            connection.task.abort();
        }
    }
}

fn cancel_timer(shared: &mut Shared) {
    if let Some(timer) = shared.reconnect_timer.take() {
        timer.handle.abort();
        debug!("Cancelled pending reconnect {}", timer.id);
    }
}

/// Drive one connection from open attempt to close.
async fn run_connection(
    inner: Weak<Inner>,
    transport: Arc<dyn Transport>,
    url: String,
    connect_timeout: Option<Duration>,
    generation: u64,
) {
    let attempt = match connect_timeout {
        Some(limit) => match tokio::time::timeout(limit, transport.connect(&url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(limit.as_secs())),
        },
        None => transport.connect(&url).await,
    };

    let mut handle = match attempt {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Connection attempt failed: {}", e);
            if let Some(inner) = inner.upgrade() {
                // A failed open surfaces as error then close, like a browser socket
                inner.handle_error(generation, &e.to_string());
                inner.handle_close(generation, None, &e.to_string());
            }
            return;
        }
    };

    let opened = match inner.upgrade() {
        Some(inner) => inner.handle_open(generation, handle.commands.clone()),
        None => false,
    };
    if !opened {
        let _ = handle.commands.send(TransportCommand::Close);
        return;
    }

    while let Some(event) = handle.events.recv().await {
        let client = match inner.upgrade() {
            Some(client) => client,
            None => {
                let _ = handle.commands.send(TransportCommand::Close);
                return;
            }
        };

        match event {
            TransportEvent::Text(text) => client.handle_text(generation, &text),
            TransportEvent::Error(message) => client.handle_error(generation, &message),
            TransportEvent::Closed { code, reason } => {
                client.handle_close(generation, code, &reason);
                return;
            }
        }
    }

    if let Some(inner) = inner.upgrade() {
        inner.handle_close(generation, None, "transport ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryTokens, MockTransport, RecordingStatus};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_config() -> ClientConfig {
        ClientConfig::new()
            .with_api_base_url("http://test.local")
            .with_base_delay(Duration::from_millis(5000))
            .with_max_reconnect_attempts(5)
    }

    fn client_with(transport: &MockTransport) -> (RealtimeClient, Arc<RecordingStatus>) {
        let status = Arc::new(RecordingStatus::new());
        let client = RealtimeClient::builder(test_config())
            .transport(Arc::new(transport.clone()))
            .status_sink(status.clone())
            .build();
        (client, status)
    }

    async fn wait_for_state<P>(client: &RealtimeClient, predicate: P) -> ConnectionState
    where
        P: FnMut(&ConnectionState) -> bool,
    {
        let mut rx = client.state_receiver();
        let state = rx.wait_for(predicate).await.unwrap().clone();
        state
    }

    #[tokio::test]
    async fn test_connect_opens_and_resets_counter() {
        let transport = MockTransport::new();
        let (client, status) = client_with(&transport);

        client.connect();
        let _session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;

        assert!(client.is_connected());
        assert_eq!(client.reconnect_attempts(), 0);
        assert_eq!(status.last(), Some(true));
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_twice_is_noop() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);
        client.subscribe(|_| {});

        client.connect();
        client.connect();
        let _session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;
        client.connect();
        tokio::task::yield_now().await;

        assert_eq!(transport.connect_count(), 1);
        assert_eq!(client.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_token_appended_to_url() {
        let transport = MockTransport::new();
        let tokens = Arc::new(InMemoryTokens::with_token("abc 123"));
        let client = RealtimeClient::builder(test_config())
            .transport(Arc::new(transport.clone()))
            .token_provider(tokens.clone())
            .build();

        assert_eq!(
            client.endpoint_url(),
            "ws://test.local/api/ws/chat?token=abc%20123"
        );

        tokens.clear();
        assert_eq!(client.endpoint_url(), "ws://test.local/api/ws/chat");
    }

    #[tokio::test]
    async fn test_messages_fan_out_in_order() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_a = log.clone();
        client.subscribe(move |msg| log_a.lock().push(("a", msg.clone())));
        let log_b = log.clone();
        client.subscribe(move |msg| log_b.lock().push(("b", msg.clone())));

        client.connect();
        let session = transport.next_session().await;
        session.push_text(r#"{"type":"chat_message","content":"hi"}"#);
        session.close("done");
        wait_for_state(&client, |s| s.is_reconnecting()).await;

        let expected = json!({"type": "chat_message", "content": "hi"});
        assert_eq!(
            *log.lock(),
            vec![("a", expected.clone()), ("b", expected)]
        );
    }

    #[tokio::test]
    async fn test_malformed_message_is_dropped() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        client.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        let session = transport.next_session().await;
        session.push_text("not json {");
        session.push_text(r#"{"ok":true}"#);
        session.close("done");
        wait_for_state(&client, |s| s.is_reconnecting()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_without_connection() {
        let transport = MockTransport::new();
        let (client, status) = client_with(&transport);

        let result = client.send_message(&json!({"content": "hello"}));
        assert!(matches!(result, Err(ClientError::NotConnected)));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(status.history().is_empty());
        assert_eq!(transport.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_send_when_connected() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);

        client.connect();
        let mut session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;

        client
            .send_message(&json!({"type": "typing", "is_typing": true}))
            .unwrap();
        let sent = session.next_sent().await.unwrap();
        let parsed: Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(parsed["type"], "typing");
    }

    #[tokio::test]
    async fn test_error_event_marks_disconnected_without_scheduling() {
        let transport = MockTransport::new();
        let (client, status) = client_with(&transport);

        client.connect();
        let session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;

        let mut rx = client.receiver();
        session.push_error("socket reset");
        session.push_text(r#"{"after":"error"}"#);
        // Events are handled in order, so the error has been seen by now
        rx.recv().await.unwrap();

        assert_eq!(status.last(), Some(false));
        assert!(!client.has_pending_reconnect());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_close_schedules_reconnect_and_recovers() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);

        client.connect();
        let session = transport.next_session().await;
        session.close("server restart");

        let state = wait_for_state(&client, |s| s.is_reconnecting()).await;
        assert_eq!(
            state,
            ConnectionState::ReconnectScheduled {
                attempt: 1,
                delay: Duration::from_millis(5000)
            }
        );
        assert_eq!(client.reconnect_attempts(), 1);

        let _second = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;
        assert_eq!(client.reconnect_attempts(), 0);
        assert_eq!(transport.connect_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_cancels_pending_reconnect() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);

        client.connect();
        let session = transport.next_session().await;
        session.close("drop");
        wait_for_state(&client, |s| s.is_reconnecting()).await;
        assert!(client.has_pending_reconnect());

        client.disconnect();
        assert!(!client.has_pending_reconnect());
        assert_eq!(client.reconnect_attempts(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.connect_count(), 1);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_reset_reconnect_attempts_clears_exhausted() {
        let transport = MockTransport::new();
        transport.fail_next(1);
        let status = Arc::new(RecordingStatus::new());
        let client = RealtimeClient::builder(test_config().with_max_reconnect_attempts(0))
            .transport(Arc::new(transport.clone()))
            .status_sink(status)
            .build();

        client.connect();
        wait_for_state(&client, |s| s.is_exhausted()).await;
        assert!(!client.has_pending_reconnect());

        client.reset_reconnect_attempts();
        assert_eq!(client.reconnect_attempts(), 0);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_drop_closes_transport() {
        let transport = MockTransport::new();
        let (client, _status) = client_with(&transport);

        client.connect();
        let mut session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;

        drop(client);
        assert_eq!(session.next_command().await, Some(TransportCommand::Close));
    }

    /// Sink that reads the client back on every update.
    #[derive(Default)]
    struct ReadBackStatus {
        client: Mutex<Option<RealtimeClient>>,
        seen: Mutex<Vec<(bool, bool, u32)>>,
    }

    impl ConnectionStatusSink for ReadBackStatus {
        fn set_connected(&self, connected: bool) {
            let client = self.client.lock().clone();
            if let Some(client) = client {
                self.seen.lock().push((
                    connected,
                    client.is_connected(),
                    client.reconnect_attempts(),
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_status_sink_may_read_client_back() {
        let transport = MockTransport::new();
        let status = Arc::new(ReadBackStatus::default());
        let client = RealtimeClient::builder(test_config())
            .transport(Arc::new(transport.clone()))
            .status_sink(status.clone())
            .build();
        *status.client.lock() = Some(client.clone());

        client.connect();
        let session = transport.next_session().await;
        wait_for_state(&client, |s| s.is_connected()).await;
        session.close("server restart");
        wait_for_state(&client, |s| s.is_reconnecting()).await;
        client.disconnect();

        assert_eq!(
            *status.seen.lock(),
            vec![(true, true, 0), (false, false, 1), (false, false, 0)]
        );
        status.client.lock().take();
    }
}
