//! Tungstenite-based WebSocket transport.
//!
//! Opens the socket with `connect_async`, splits it, and spawns a pump
//! task that bridges the socket to the [`TransportHandle`] channels.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::error::TransportError;
use crate::traits::{Transport, TransportCommand, TransportEvent, TransportHandle};
use crate::websocket::endpoint::redact_token;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport using tokio-tungstenite.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use storefront_realtime::adapters::TungsteniteTransport;
/// use storefront_realtime::websocket::RealtimeClient;
///
/// let client = RealtimeClient::builder(config)
///     .transport(Arc::new(TungsteniteTransport::new()))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for TungsteniteTransport {
    async fn connect(&self, url: &str) -> Result<TransportHandle, TransportError> {
        let (ws_stream, _response) = connect_async(url).await.map_err(TransportError::from)?;
        info!("Connected to WebSocket server at {}", redact_token(url));

        let (ws_sink, ws_stream) = ws_stream.split();
        let (handle, commands_rx, events_tx) = TransportHandle::pair();

        tokio::spawn(run_pump(ws_sink, ws_stream, commands_rx, events_tx));

        Ok(handle)
    }
}

/// Bridge socket frames and client commands until either side closes.
async fn run_pump(
    mut ws_sink: SplitSink<WsStream, Message>,
    mut ws_stream: SplitStream<WsStream>,
    mut commands: mpsc::UnboundedReceiver<TransportCommand>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(TransportEvent::Text(text)).is_err() {
                            debug!("Event receiver gone, closing socket");
                            let _ = ws_sink.close().await;
                            return;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                            .unwrap_or((None, String::new()));
                        info!("Received close frame from server (code {:?})", code);
                        let _ = events.send(TransportEvent::Closed { code, reason });
                        return;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong and raw frames carry nothing for us
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        let _ = events.send(TransportEvent::Error(e.to_string()));
                        let _ = events.send(TransportEvent::closed(e.to_string()));
                        return;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        let _ = events.send(TransportEvent::closed("stream ended"));
                        return;
                    }
                }
            }
            command = commands.recv() => {
                match command {
                    Some(TransportCommand::Send(text)) => {
                        if let Err(e) = ws_sink.send(Message::Text(text)).await {
                            warn!("Failed to send frame: {}", e);
                            let _ = events.send(TransportEvent::Error(e.to_string()));
                        }
                    }
                    Some(TransportCommand::Close) | None => {
                        debug!("Closing WebSocket on client request");
                        let _ = ws_sink.close().await;
                        let _ = events.send(TransportEvent::closed("closed by client"));
                        return;
                    }
                }
            }
        }
    }
}
