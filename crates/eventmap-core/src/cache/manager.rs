use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::error::{CacheError, Result};
use super::store::KeyValueStore;

/// Cache key for the authenticated user record
pub const USER_INFO_KEY: &str = "userInfo";

/// Cache key for the bearer token issued at login
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Cache key for the last fetched event list
pub const EVENTS_KEY: &str = "events";

/// JSON cache over a `KeyValueStore`.
/// Clone is cheap - the store is shared behind an Arc.
pub struct CacheManager<S> {
    store: Arc<S>,
}

impl<S> Clone for CacheManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> CacheManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a manager over a store that is also held elsewhere
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize `value` as JSON and store it under `key`, replacing any prior value.
    /// Resolves once the store has acknowledged the write.
    pub async fn set_in_cache<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set_item(key, json).await
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// A key that was never written is an error, not a default. A key written
    /// as JSON `null` is present: read it as `Option<T>` to get `None`.
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.store.get_item(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(CacheError::NotInCache {
                key: key.to_string(),
            }),
        }
    }

    /// Remove several keys at once
    pub async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.store.multi_remove(keys).await
    }

    /// Await `fetch` once. On success the value is written through to the
    /// cache and returned; on failure the last cached value for `key` is
    /// returned instead.
    ///
    /// A failed write-through is logged and does not fail the call. If the
    /// fetch fails and nothing is cached, the cache error is returned.
    pub async fn get_from_network_first<T, E, F>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        E: Display,
        F: Future<Output = std::result::Result<T, E>>,
    {
        if key.is_empty() {
            return Err(CacheError::InvalidKey(String::new()));
        }

        match fetch.await {
            Ok(value) => {
                if let Err(e) = self.set_in_cache(key, &value).await {
                    warn!(key = key, error = %e, "Failed to cache network response");
                } else {
                    debug!(key = key, "Network response cached");
                }
                Ok(value)
            }
            Err(fetch_err) => {
                warn!(key = key, error = %fetch_err, "Fetch failed, falling back to cache");
                self.get_from_cache(key).await
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
