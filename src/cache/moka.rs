//! Moka 缓存后端
//!
//! TTL 和容量淘汰由 moka 负责；`entry().or_insert_with()` 保证
//! 同一 key 的并发写入只有一个生效。

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, trace};

use crate::cache::{CacheResult, InsertOutcome, LookupCache};
use crate::errors::Result;
use crate::services::geoip::{GeoRecord, LookupKey};

pub struct MokaLookupCache {
    /// clear 时整体替换为新实例，保证清空后计数立即为 0
    inner: ArcSwap<Cache<LookupKey, GeoRecord>>,
    ttl: Duration,
    max_capacity: u64,
}

impl MokaLookupCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        debug!(
            "MokaLookupCache initialized with max capacity: {}, TTL: {:?}",
            max_capacity, ttl
        );
        Self {
            inner: ArcSwap::from_pointee(Self::build(ttl, max_capacity)),
            ttl,
            max_capacity,
        }
    }

    fn build(ttl: Duration, max_capacity: u64) -> Cache<LookupKey, GeoRecord> {
        Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build()
    }

    #[inline]
    fn current(&self) -> Arc<Cache<LookupKey, GeoRecord>> {
        self.inner.load_full()
    }
}

#[async_trait]
impl LookupCache for MokaLookupCache {
    async fn get(&self, key: &LookupKey) -> Result<CacheResult> {
        match self.current().get(key).await {
            Some(record) => Ok(CacheResult::Found(record)),
            None => Ok(CacheResult::NotFound),
        }
    }

    async fn insert(&self, key: &LookupKey, record: GeoRecord) -> Result<InsertOutcome> {
        let entry = self
            .current()
            .entry(key.clone())
            .or_insert_with(async move { record })
            .await;

        let outcome = if entry.is_fresh() {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::AlreadyPresent
        };
        trace!("Moka insert for {}: {:?}", key, outcome);
        Ok(outcome)
    }

    async fn clear(&self) -> Result<u64> {
        let fresh = Arc::new(Self::build(self.ttl, self.max_capacity));
        let old = self.inner.swap(fresh);
        old.run_pending_tasks().await;
        let removed = old.entry_count();
        old.invalidate_all();
        Ok(removed)
    }

    async fn count(&self) -> Result<u64> {
        let cache = self.current();
        cache.run_pending_tasks().await;
        Ok(cache.entry_count())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn name(&self) -> &'static str {
        "moka"
    }
}
