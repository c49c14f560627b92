//! Short-lived read cache for settings records.

use metrics::counter;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::{OwnerKey, SettingsRecord};

struct CachedRecord {
    record: SettingsRecord,
    stored_at: Instant,
}

/// Per-owner record cache with a fixed time-to-live.
pub struct SettingsCache {
    ttl: Duration,
    entries: RwLock<HashMap<OwnerKey, CachedRecord>>,
}

impl SettingsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached record if it is younger than the TTL.
    pub async fn get(&self, owner: &OwnerKey) -> Option<SettingsRecord> {
        let entries = self.entries.read().await;
        match entries.get(owner) {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                counter!("settings_cache_hits_total", "scope" => owner.scope.as_str()).increment(1);
                Some(cached.record.clone())
            }
            _ => {
                counter!("settings_cache_misses_total", "scope" => owner.scope.as_str())
                    .increment(1);
                None
            }
        }
    }

    /// Caches `record` unless a newer copy of it is already cached.
    ///
    /// Writes can finish out of order; the entry only moves forward in
    /// `updated_at`.
    pub async fn put(&self, record: SettingsRecord) {
        let mut entries = self.entries.write().await;
        if let Some(cached) = entries.get(&record.owner) {
            if cached.record.updated_at > record.updated_at {
                return;
            }
        }
        entries.insert(
            record.owner,
            CachedRecord {
                record,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, owner: &OwnerKey) {
        self.entries.write().await.remove(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = SettingsCache::new(Duration::from_secs(60));
        let record = SettingsRecord::empty(OwnerKey::platform());
        cache.put(record.clone()).await;

        assert_eq!(cache.get(&OwnerKey::platform()).await, Some(record));
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = SettingsCache::new(Duration::from_millis(5));
        cache.put(SettingsRecord::empty(OwnerKey::platform())).await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&OwnerKey::platform()).await.is_none());
    }

    #[tokio::test]
    async fn test_older_record_does_not_replace_newer() {
        let cache = SettingsCache::new(Duration::from_secs(60));
        let older = SettingsRecord::empty(OwnerKey::platform());
        let mut newer = older.clone();
        newer.updated_at = older.updated_at + chrono::Duration::seconds(1);

        cache.put(newer.clone()).await;
        cache.put(older).await;

        assert_eq!(cache.get(&OwnerKey::platform()).await, Some(newer));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = SettingsCache::new(Duration::from_secs(60));
        cache.put(SettingsRecord::empty(OwnerKey::platform())).await;
        cache.invalidate(&OwnerKey::platform()).await;

        assert!(cache.get(&OwnerKey::platform()).await.is_none());
    }
}
