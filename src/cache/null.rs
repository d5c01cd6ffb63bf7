//! 禁用缓存时使用的空实现
//!
//! 所有操作都返回 `CacheUnavailable`，上层降级为直接查询上游。

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheResult, InsertOutcome, LookupCache};
use crate::errors::{GeoLookupError, Result};
use crate::services::geoip::{GeoRecord, LookupKey};

#[derive(Debug, Default)]
pub struct NullLookupCache;

impl NullLookupCache {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> GeoLookupError {
        GeoLookupError::cache_unavailable("lookup cache is disabled (cache.type = \"none\")")
    }
}

#[async_trait]
impl LookupCache for NullLookupCache {
    async fn get(&self, _key: &LookupKey) -> Result<CacheResult> {
        Err(Self::unavailable())
    }

    async fn insert(&self, _key: &LookupKey, _record: GeoRecord) -> Result<InsertOutcome> {
        Err(Self::unavailable())
    }

    async fn clear(&self) -> Result<u64> {
        Err(Self::unavailable())
    }

    async fn count(&self) -> Result<u64> {
        Err(Self::unavailable())
    }

    fn ttl(&self) -> Duration {
        Duration::ZERO
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
