//! Session token provider trait.

use std::sync::Arc;

/// Source of the current session token.
///
/// Called synchronously every time the client builds its endpoint URL,
/// so a token refreshed between reconnects is picked up automatically.
pub trait TokenProvider: Send + Sync {
    /// The token to authenticate with, or `None` when signed out.
    fn current_token(&self) -> Option<String>;
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn current_token(&self) -> Option<String> {
        (**self).current_token()
    }
}

/// No token, ever. Useful for anonymous channels.
impl TokenProvider for () {
    fn current_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token.
impl TokenProvider for String {
    fn current_token(&self) -> Option<String> {
        Some(self.clone())
    }
}
