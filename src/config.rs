//! Client configuration.
//!
//! [`ClientConfig::default()`] never reads the environment; use
//! [`ClientConfig::from_env()`] to pick up the `STOREFRONT_*` variables.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use storefront_realtime::config::ClientConfig;
//!
//! let config = ClientConfig::from_env()
//!     .with_max_reconnect_attempts(3)
//!     .with_connect_timeout(Duration::from_secs(10));
//! ```

use std::time::Duration;

use tracing::warn;

use crate::websocket::backoff::ReconnectPolicy;

/// Fallback API address when `STOREFRONT_API_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Sub-path of the chat/notification socket.
pub const DEFAULT_WS_PATH: &str = "/ws/chat";

/// Base reconnect delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 5000;

/// Reconnect attempts before the client gives up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Capacity of the broadcast channel behind [`RealtimeClient::receiver`](crate::websocket::RealtimeClient::receiver).
pub const DEFAULT_BROADCAST_CAPACITY: usize = 100;

pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
pub const ENV_WS_PATH: &str = "STOREFRONT_WS_PATH";
pub const ENV_BASE_DELAY_MS: &str = "STOREFRONT_WS_BASE_DELAY_MS";
pub const ENV_MAX_ATTEMPTS: &str = "STOREFRONT_WS_MAX_ATTEMPTS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "STOREFRONT_WS_CONNECT_TIMEOUT_SECS";

/// Configuration for [`RealtimeClient`](crate::websocket::RealtimeClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base REST API address (e.g. `https://shop.example.com/api`)
    pub api_base_url: String,
    /// Socket sub-path appended after the `/api` segment
    pub ws_path: String,
    /// Delay before the first reconnect; doubles on every further attempt
    pub base_delay: Duration,
    /// Scheduled reconnects allowed before the client stays down
    pub max_reconnect_attempts: u32,
    /// Upper bound on a single connect attempt (None = transport default)
    pub connect_timeout: Option<Duration>,
    /// Buffered messages per broadcast receiver
    pub broadcast_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            connect_timeout: None,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(path) = lookup(ENV_WS_PATH).filter(|v| !v.trim().is_empty()) {
            config.ws_path = path.trim().to_string();
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_BASE_DELAY_MS) {
            config.base_delay = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, ENV_MAX_ATTEMPTS) {
            config.max_reconnect_attempts = attempts;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_CONNECT_TIMEOUT_SECS) {
            config.connect_timeout = Some(Duration::from_secs(secs));
        }

        config
    }

    /// Set the base API address.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the socket sub-path.
    pub fn with_ws_path(mut self, path: impl Into<String>) -> Self {
        self.ws_path = path.into();
        self
    }

    /// Set the base reconnect delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the reconnect attempt cap.
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Bound each connect attempt.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the broadcast channel capacity (minimum 1).
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }

    /// Reconnect policy derived from this config.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(self.base_delay, self.max_reconnect_attempts)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}
