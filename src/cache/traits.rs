use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;
use crate::services::geoip::{GeoRecord, LookupKey};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    /// 存在且未过期
    Found(GeoRecord),
    /// 不存在或已过期
    NotFound,
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// 已有未过期条目，本次写入被忽略
    AlreadyPresent,
}

/// 查询结果缓存
///
/// - `get` 不会刷新 TTL
/// - `insert` 遵循 first-writer-wins：未过期的旧条目和它的过期时间保持不变
/// - 后端不可用时返回 `CacheUnavailable`，调用方应降级为直接查询上游
#[async_trait]
pub trait LookupCache: Send + Sync {
    async fn get(&self, key: &LookupKey) -> Result<CacheResult>;

    async fn insert(&self, key: &LookupKey, record: GeoRecord) -> Result<InsertOutcome>;

    /// 清空全部条目，返回清除前的条目数
    async fn clear(&self) -> Result<u64>;

    /// 当前跟踪的条目数（可能包含尚未清理的过期条目）
    async fn count(&self) -> Result<u64>;

    /// 所有条目统一使用的 TTL
    fn ttl(&self) -> Duration;

    /// 后端名称（用于日志和健康检查）
    fn name(&self) -> &'static str;
}
