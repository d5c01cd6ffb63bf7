//! Cache-aside lookup
//!
//! get → (miss) fetch → project → insert-if-absent → record

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::geoip::{Fetcher, GeoRecord, LookupKey};
use crate::cache::{CacheResult, InsertOutcome, LookupCache};
use crate::errors::{GeoLookupError, Result};
use crate::storage::{LookupRecord, Recorder};

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    CacheHit,
    /// Fetched upstream after `retry_count` failed attempts
    Fetched { retry_count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub record: GeoRecord,
    pub provenance: Provenance,
}

impl LookupOutcome {
    pub fn is_cache_hit(&self) -> bool {
        matches!(self.provenance, Provenance::CacheHit)
    }

    pub fn retry_count(&self) -> Option<u32> {
        match self.provenance {
            Provenance::CacheHit => None,
            Provenance::Fetched { retry_count } => Some(retry_count),
        }
    }
}

pub struct LookupService {
    cache: Arc<dyn LookupCache>,
    fetcher: Arc<Fetcher>,
    recorder: Arc<dyn Recorder>,
}

impl LookupService {
    pub fn new(
        cache: Arc<dyn LookupCache>,
        fetcher: Arc<Fetcher>,
        recorder: Arc<dyn Recorder>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            recorder,
        }
    }

    pub fn cache(&self) -> &Arc<dyn LookupCache> {
        &self.cache
    }

    pub fn recorder(&self) -> &Arc<dyn Recorder> {
        &self.recorder
    }

    /// Validate `raw` and resolve it
    ///
    /// Invalid input fails with `InvalidKey` before the cache or upstream is touched.
    pub async fn lookup(&self, raw: &str) -> Result<LookupOutcome> {
        let key = LookupKey::parse(raw)?;
        self.lookup_key(&key).await
    }

    pub async fn lookup_key(&self, key: &LookupKey) -> Result<LookupOutcome> {
        // 缓存不可用时降级为直接查询上游
        let cache_available = match self.cache.get(key).await {
            Ok(CacheResult::Found(record)) => {
                debug!("Cache hit for {}", key);
                return Ok(LookupOutcome {
                    record,
                    provenance: Provenance::CacheHit,
                });
            }
            Ok(CacheResult::NotFound) => {
                debug!("Cache miss for {}", key);
                true
            }
            Err(GeoLookupError::CacheUnavailable(msg)) => {
                warn!("Cache unavailable, fetching {} directly: {}", key, msg);
                false
            }
            Err(e) => return Err(e),
        };

        let fetched = match self.fetcher.fetch(key).await {
            Ok(fetched) => fetched,
            Err(e) => {
                self.record(LookupRecord::failed(key)).await;
                return Err(e);
            }
        };

        for attempt in &fetched.attempts {
            debug!(
                "Upstream attempt {} for {}: {:?} (backoff {:?})",
                attempt.index, key, attempt.outcome, attempt.backoff
            );
        }

        let retry_count = fetched.retry_count;
        let record = GeoRecord::from(fetched.data);

        if cache_available {
            match self.cache.insert(key, record.clone()).await {
                Ok(InsertOutcome::Inserted) => debug!("Cached {}", key),
                Ok(InsertOutcome::AlreadyPresent) => {
                    debug!("{} already cached by a concurrent lookup", key)
                }
                // get 出错时还没有数据可返回，必须失败；
                // insert 时上游结果已经拿到，写缓存失败只影响下次命中
                Err(e) => warn!("Failed to cache {}: {}", key, e),
            }
        }

        self.record(LookupRecord::succeeded(key)).await;

        Ok(LookupOutcome {
            record,
            provenance: Provenance::Fetched { retry_count },
        })
    }

    /// 清空缓存，返回清除的条目数
    ///
    /// 缓存被禁用（`CacheUnavailable`）时没有可清除的条目，返回 0。
    pub async fn clear_cache(&self) -> Result<u64> {
        match self.cache.clear().await {
            Err(GeoLookupError::CacheUnavailable(msg)) => {
                debug!("Cache {} disabled, nothing to clear: {}", self.cache.name(), msg);
                Ok(0)
            }
            other => other,
        }
    }

    pub async fn cache_count(&self) -> Result<u64> {
        self.cache.count().await
    }

    async fn record(&self, record: LookupRecord) {
        let ip = record.ip_address.clone();
        if let Err(e) = self.recorder.record(record).await {
            warn!(
                "Recorder {} failed to persist lookup for {}: {}",
                self.recorder.name(),
                ip,
                e
            );
        }
    }
}
