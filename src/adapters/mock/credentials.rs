//! In-memory token provider for testing.

use std::sync::{Arc, Mutex};

use crate::traits::TokenProvider;

/// Token provider whose token tests can swap at will.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokens {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryTokens {
    /// Signed out.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set_token(token);
        provider
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap() = Some(token.into());
    }

    /// Simulate sign-out.
    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

impl TokenProvider for InMemoryTokens {
    fn current_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}
