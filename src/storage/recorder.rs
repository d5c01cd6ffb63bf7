use async_trait::async_trait;
use tracing::trace;

use super::models::LookupRecord;
use crate::errors::Result;

/// 查询审计 sink
///
/// 调用方只记录失败日志，不会因为 `record` 出错而让查询失败。
#[async_trait]
pub trait Recorder: Send + Sync {
    async fn record(&self, record: LookupRecord) -> Result<()>;

    /// 已持久化的记录数；不落盘的 recorder 返回 `None`
    async fn stored_count(&self) -> Result<Option<u64>> {
        Ok(None)
    }

    /// recorder 名称（用于日志和健康检查）
    fn name(&self) -> &'static str;
}

/// `database_url` 为空时使用，丢弃所有记录
pub struct NoopRecorder;

#[async_trait]
impl Recorder for NoopRecorder {
    async fn record(&self, record: LookupRecord) -> Result<()> {
        trace!(
            "Recording disabled, dropping lookup record for {}",
            record.ip_address
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
