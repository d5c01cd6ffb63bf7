use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::cache::CacheHandle;
use crate::storage::SeaOrmRecorder;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 单个任务超时时间（秒）
const TASK_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C
///
/// 进行中的上游重试不做取消，随 server 停止自然结束。
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}

/// 停止后台任务并关闭数据库连接
pub async fn perform_shutdown(cache: &mut CacheHandle, database: Option<Arc<SeaOrmRecorder>>) {
    let result = timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        shutdown_tasks(cache, database),
    )
    .await;

    match result {
        Ok(()) => info!("All shutdown tasks completed successfully"),
        Err(_) => error!(
            "Shutdown tasks timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

async fn shutdown_tasks(cache: &mut CacheHandle, database: Option<Arc<SeaOrmRecorder>>) {
    cache.shutdown();
    info!("Cache sweeper stopped");

    let Some(db) = database else {
        info!("Recorder has no database, skipping close");
        return;
    };

    match timeout(Duration::from_secs(TASK_TIMEOUT_SECS), db.close()).await {
        Ok(Ok(())) => info!("Database connection closed"),
        Ok(Err(e)) => error!("Failed to close database connection: {}", e),
        Err(_) => error!(
            "Database close timed out after {} seconds",
            TASK_TIMEOUT_SECS
        ),
    }
}
