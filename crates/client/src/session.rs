//! In-memory session storage for the auth token.
//!
//! Mirrors the device key-value store the app keeps its login token in:
//! opaque string values under string keys, with the bearer token stored
//! under a fixed key. The persistence format of the token is out of scope;
//! this store lives for the duration of the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::SecretString;

/// Fixed key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Shared session storage.
///
/// Cheaply cloneable; all clones observe the same values.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SecretString>>>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a key, replacing any previous value.
    pub fn set(&self, key: &str, value: SecretString) {
        self.lock().insert(key.to_string(), value);
    }

    /// Fetch a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SecretString> {
        self.lock().get(key).cloned()
    }

    /// Remove a value by key.
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Store the bearer token under the fixed token key.
    pub fn set_token(&self, token: SecretString) {
        self.set(TOKEN_KEY, token);
    }

    /// The bearer token, if a user is logged in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.get(TOKEN_KEY)
    }

    /// Discard the bearer token (logout).
    pub fn clear_token(&self) {
        self.remove(TOKEN_KEY);
    }

    /// Whether a token is present (not whether it is still valid).
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.lock().contains_key(TOKEN_KEY)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SecretString>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("keys", &self.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}
