use std::{path::Path, sync::Mutex, time::Duration};

use rusqlite::{params, Connection, OptionalExtension};

use super::{expires_at, now_millis, CacheError, CacheResult, ResponseCache};

/// Cache that survives restarts, backed by a SQLite file
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    pub fn open<P: AsRef<Path>>(path: P) -> CacheResult<SqliteCache> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // with WAL, worst that could happen is losing the last few writes
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> CacheResult<SqliteCache> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS response_cache (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS response_cache_expires_at
                ON response_cache (expires_at);",
        )?;

        Ok(SqliteCache {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> CacheResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT value FROM response_cache WHERE key = ?1 AND expires_at > ?2",
        )?;

        let value = stmt
            .query_row(params![key, now_millis()], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO response_cache (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
        )?;

        stmt.execute(params![key, value, expires_at(ttl)])?;
        Ok(())
    }

    fn purge_expired(&self) -> CacheResult<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM response_cache WHERE expires_at <= ?1",
            params![now_millis()],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod test {

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_get_set() {
        let cache = SqliteCache::open(":memory:").unwrap();
        assert_eq!(cache.get("places:新宿").unwrap(), None);

        cache.set("places:新宿", "[]", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("places:新宿").unwrap().as_deref(), Some("[]"));

        cache.set("places:新宿", "[1]", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("places:新宿").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_expiry_and_purge() {
        let cache = SqliteCache::open(":memory:").unwrap();
        cache.set("old", "v", Duration::ZERO).unwrap();
        cache.set("new", "v", Duration::from_secs(60)).unwrap();

        assert_eq!(cache.get("old").unwrap(), None);
        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.get("new").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("cache.sqlite");

        {
            let cache = SqliteCache::open(&path).unwrap();
            cache.set("k", "v", Duration::from_secs(60)).unwrap();
        }

        let cache = SqliteCache::open(&path).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
    }
}
