//! DashMap 内存缓存
//!
//! 过期条目在 `get` / `insert` 时惰性清理，
//! 另外可以启动一个后台任务定期清理未被访问的过期条目。

use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::cache::{CacheResult, InsertOutcome, LookupCache};
use crate::errors::Result;
use crate::services::geoip::{GeoRecord, LookupKey};

/// TTL 太大导致 Instant 溢出时使用的过期时间（约 30 年）
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Clone)]
struct CacheEntry {
    record: GeoRecord,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(record: GeoRecord, now: Instant, ttl: Duration) -> Self {
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { record, expires_at }
    }

    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct MemoryLookupCache {
    entries: DashMap<LookupKey, CacheEntry>,
    ttl: Duration,
}

impl MemoryLookupCache {
    pub fn new(ttl: Duration) -> Self {
        debug!("MemoryLookupCache initialized with TTL {:?}", ttl);
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Spawn the periodic sweep task
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即返回，跳过
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    debug!("Cache dropped, sweeper exiting");
                    break;
                };
                let removed = cache.purge_expired();
                if removed > 0 {
                    debug!("Cache sweeper removed {} expired entries", removed);
                }
            }
        })
    }
}

#[async_trait]
impl LookupCache for MemoryLookupCache {
    async fn get(&self, key: &LookupKey) -> Result<CacheResult> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                return Ok(CacheResult::Found(entry.record.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // 只删除仍然过期的条目，避免误删并发写入的新条目
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
            trace!("Lazily evicted expired entry for {}", key);
        }

        Ok(CacheResult::NotFound)
    }

    async fn insert(&self, key: &LookupKey, record: GeoRecord) -> Result<InsertOutcome> {
        let now = Instant::now();

        let outcome = match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(CacheEntry::new(record, now, self.ttl));
                    InsertOutcome::Inserted
                } else {
                    InsertOutcome::AlreadyPresent
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(record, now, self.ttl));
                InsertOutcome::Inserted
            }
        };

        trace!("Cache insert for {}: {:?}", key, outcome);
        Ok(outcome)
    }

    async fn clear(&self) -> Result<u64> {
        let removed = self.entries.len() as u64;
        self.entries.clear();
        Ok(removed)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.entries.len() as u64)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> LookupKey {
        LookupKey::parse(raw).unwrap()
    }

    fn record(city: &str) -> GeoRecord {
        GeoRecord {
            city: Some(city.to_string()),
            region: None,
            country: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_replaced_on_insert() {
        let cache = MemoryLookupCache::new(Duration::from_secs(60));
        let k = key("1.1.1.1");

        cache.insert(&k, record("first")).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        let outcome = cache.insert(&k, record("second")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(
            cache.get(&k).await.unwrap(),
            CacheResult::Found(record("second"))
        );
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_lazily_evicts() {
        let cache = MemoryLookupCache::new(Duration::from_secs(5));
        let k = key("1.1.1.1");

        cache.insert(&k, record("a")).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.count().await.unwrap(), 1);
        assert_eq!(cache.get(&k).await.unwrap(), CacheResult::NotFound);
        assert_eq!(cache.count().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = MemoryLookupCache::new(Duration::from_secs(10));

        cache.insert(&key("1.1.1.1"), record("old")).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.insert(&key("2.2.2.2"), record("new")).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.count().await.unwrap(), 1);
        assert!(matches!(
            cache.get(&key("2.2.2.2")).await.unwrap(),
            CacheResult::Found(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reclaims_expired_entries() {
        let cache = Arc::new(MemoryLookupCache::new(Duration::from_secs(1)));
        let handle = cache.spawn_sweeper(Duration::from_secs(2));

        cache.insert(&key("1.1.1.1"), record("a")).await.unwrap();
        cache.insert(&key("2.2.2.2"), record("b")).await.unwrap();
        assert_eq!(cache.count().await.unwrap(), 2);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(cache.count().await.unwrap(), 0);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_exits_when_cache_dropped() {
        let cache = Arc::new(MemoryLookupCache::new(Duration::from_secs(1)));
        let handle = cache.spawn_sweeper(Duration::from_secs(1));
        drop(cache);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(handle.is_finished());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let now = Instant::now();
        let entry = CacheEntry::new(record("a"), now, Duration::MAX);
        assert!(!entry.is_expired(now));
    }
}
