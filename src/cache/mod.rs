//! Token Cache
//!
//! Persists the token set of a signed-in account across flows. The default
//! implementation is in-memory; callers needing durable storage implement
//! [`TokenCache`] themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::NativeAuthError;
use crate::types::StoredTokens;

/// Token cache interface, keyed by username.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Store the token set for a username, replacing any previous set.
    async fn store(&self, username: &str, tokens: StoredTokens) -> Result<(), NativeAuthError>;

    /// Retrieve the token set for a username.
    async fn retrieve(&self, username: &str) -> Result<Option<StoredTokens>, NativeAuthError>;

    /// Delete the token set for a username. Returns whether one existed.
    async fn delete(&self, username: &str) -> Result<bool, NativeAuthError>;

    /// Clear all cached token sets.
    async fn clear(&self) -> Result<(), NativeAuthError>;
}

/// In-memory token cache.
pub struct InMemoryTokenCache {
    tokens: Mutex<HashMap<String, StoredTokens>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn store(&self, username: &str, tokens: StoredTokens) -> Result<(), NativeAuthError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(username.to_string(), tokens);
        Ok(())
    }

    async fn retrieve(&self, username: &str) -> Result<Option<StoredTokens>, NativeAuthError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.get(username).cloned())
    }

    async fn delete(&self, username: &str) -> Result<bool, NativeAuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        Ok(tokens.remove(username).is_some())
    }

    async fn clear(&self) -> Result<(), NativeAuthError> {
        self.tokens.lock().unwrap().clear();
        Ok(())
    }
}
