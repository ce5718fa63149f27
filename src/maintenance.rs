use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::cache::{CacheResult, ResponseCache};

pub fn purge_once(cache: &dyn ResponseCache) -> CacheResult<usize> {
    let removed = cache.purge_expired()?;
    if removed > 0 {
        log::info!("Purged {} expired cache entries", removed);
    } else {
        log::debug!("No expired cache entries");
    }
    Ok(removed)
}

/// Runs forever, dropping expired cache entries every `interval`
pub async fn keep_maintained(cache: Arc<dyn ResponseCache>, interval: Duration) -> CacheResult<()> {
    loop {
        log::debug!("Waiting {} seconds for maintenance", interval.as_secs());
        sleep(interval).await;

        // a failed purge is retried next time round, expired entries are
        // never served anyway
        if let Err(e) = purge_once(cache.as_ref()) {
            log::error!("Error purging cache: {}", e);
        }
    }
}
