use std::sync::Arc;

use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;
mod recorder;

pub use backend::{SeaOrmRecorder, infer_backend_from_url};
pub use models::LookupRecord;
pub use recorder::{NoopRecorder, Recorder};

/// Recorder 及其数据库连接（关闭时需要）
pub struct RecorderHandle {
    pub recorder: Arc<dyn Recorder>,
    pub database: Option<Arc<SeaOrmRecorder>>,
}

/// 根据配置创建 recorder；`database_url` 为空时返回 `NoopRecorder`
pub async fn create_recorder(config: &DatabaseConfig) -> Result<RecorderHandle> {
    if config.database_url.trim().is_empty() {
        warn!("database.database_url is empty, lookup recording disabled");
        return Ok(RecorderHandle {
            recorder: Arc::new(NoopRecorder),
            database: None,
        });
    }

    let recorder = Arc::new(SeaOrmRecorder::new(config).await?);
    Ok(RecorderHandle {
        recorder: recorder.clone(),
        database: Some(recorder),
    })
}
