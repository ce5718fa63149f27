pub mod memory;
pub mod sqlite;

use std::{future::Future, time::Duration};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store of serialized responses with a time to live
pub trait ResponseCache: Send + Sync {
    /// Value for `key`, unless missing or expired
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Drops every expired entry, returning how many were removed
    fn purge_expired(&self) -> CacheResult<usize>;
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn expires_at(ttl: Duration) -> i64 {
    now_millis().saturating_add(ttl.as_millis().try_into().unwrap_or(i64::MAX))
}

/// Typed access to a [`ResponseCache`].
///
/// Failures are logged and treated as a miss so a broken cache never
/// stops a request from reaching the provider.
pub trait ResponseCacheEx {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration);
}

impl<C: ResponseCache + ?Sized> ResponseCacheEx for C {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                log::error!("Error reading cache for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                log::debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                log::warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let result = serde_json::to_string(value)
            .map_err(CacheError::from)
            .and_then(|raw| self.set(key, &raw, ttl));

        if let Err(e) = result {
            log::error!("Error writing cache for {}: {}", key, e);
        }
    }
}

/// Cached value for `key`, or the result of `fetch` which is then cached.
/// Errors from `fetch` are returned and not cached.
pub async fn get_or_fetch<T, E, F, Fut>(
    cache: &dyn ResponseCache,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = cache.get_json(key) {
        return Ok(value);
    }

    let value = fetch().await?;
    cache.set_json(key, &value, ttl);
    Ok(value)
}
