use std::{collections::HashMap, sync::Mutex, time::Duration};

use super::{expires_at, now_millis, CacheError, CacheResult, ResponseCache};

struct Entry {
    value: String,
    expires_at: i64,
}

/// Cache scoped to this process
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        let value = entries
            .get(key)
            .filter(|e| e.expires_at > now_millis())
            .map(|e| e.value.clone());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expires_at(ttl),
            },
        );
        Ok(())
    }

    fn purge_expired(&self) -> CacheResult<usize> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        let now = now_millis();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        Ok(before - entries.len())
    }
}
