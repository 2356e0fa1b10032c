//! Realtime channel wiring for the application.
//!
//! Owns one [`RealtimeClient`] for the lifetime of the application:
//! builds it with the shared [`ConnectionStore`], connects on start, and
//! tears it down (listeners included) on shutdown.

use std::sync::Arc;

use tracing::info;

use crate::adapters::{FileTokenProvider, TungsteniteTransport};
use crate::config::ClientConfig;
use crate::domain::ConnectionStore;
use crate::traits::{TokenProvider, Transport};
use crate::websocket::{RealtimeClient, Subscription};

/// Application-scoped owner of the realtime client.
pub struct RealtimeContext {
    client: RealtimeClient,
    connection: Arc<ConnectionStore>,
    subscriptions: Vec<Subscription>,
}

impl RealtimeContext {
    /// Start the realtime channel with production adapters.
    ///
    /// The session token is read from `~/.storefront/credentials.json`
    /// on every connection attempt; without a home directory the
    /// channel connects anonymously.
    pub fn start(config: ClientConfig) -> Self {
        let tokens: Arc<dyn TokenProvider> = match FileTokenProvider::new() {
            Some(provider) => Arc::new(provider),
            None => Arc::new(()),
        };
        Self::start_with(config, Arc::new(TungsteniteTransport::new()), tokens)
    }

    /// Start the realtime channel with explicit adapters.
    pub fn start_with(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let connection = Arc::new(ConnectionStore::new());
        let client = RealtimeClient::builder(config)
            .transport(transport)
            .token_provider(tokens)
            .status_sink(connection.clone())
            .build();

        info!("Starting realtime channel at {}", client.config().api_base_url);
        client.connect();

        Self {
            client,
            connection,
            subscriptions: Vec::new(),
        }
    }

    pub fn client(&self) -> &RealtimeClient {
        &self.client
    }

    /// Shared "is connected" flag.
    pub fn connection(&self) -> Arc<ConnectionStore> {
        Arc::clone(&self.connection)
    }

    /// Register a listener owned by the context; removed on shutdown.
    pub fn listen<F>(&mut self, listener: F)
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        let subscription = self.client.subscribe(listener);
        self.subscriptions.push(subscription);
    }

    /// Remove owned listeners and close the channel.
    pub fn shutdown(mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.client.disconnect();
        info!("Realtime channel shut down");
    }
}
