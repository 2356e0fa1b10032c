//! File-based token provider adapter.
//!
//! Wraps [`CredentialsManager`] and implements [`TokenProvider`]. The file
//! is re-read on every call, so a session refreshed by another process is
//! picked up on the next reconnect.

use tracing::debug;

use crate::auth::credentials::CredentialsManager;
use crate::traits::TokenProvider;

/// Token provider backed by `~/.storefront/credentials.json`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use storefront_realtime::adapters::FileTokenProvider;
///
/// let tokens = FileTokenProvider::new().expect("home directory");
/// let client = RealtimeClient::builder(config)
///     .token_provider(Arc::new(tokens))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    manager: CredentialsManager,
}

impl FileTokenProvider {
    /// Provider for the default credentials location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        CredentialsManager::new().map(Self::with_manager)
    }

    pub fn with_manager(manager: CredentialsManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &CredentialsManager {
        &self.manager
    }
}

impl TokenProvider for FileTokenProvider {
    fn current_token(&self) -> Option<String> {
        let creds = self.manager.load();
        let token = creds.usable_token().map(str::to_string);
        if token.is_none() && creds.has_token() {
            debug!("Stored session token is expired, connecting without it");
        }
        token
    }
}
