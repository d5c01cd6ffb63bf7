use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cache::{CacheHandle, create_lookup_cache};
use crate::config::StaticConfig;
use crate::services::LookupService;
use crate::services::geoip::Fetcher;
use crate::storage::{SeaOrmRecorder, create_recorder};

pub struct StartupContext {
    pub service: Arc<LookupService>,
    pub cache_handle: CacheHandle,
    /// 数据库连接，关闭时使用；禁用记录时为 None
    pub database: Option<Arc<SeaOrmRecorder>>,
}

/// 准备服务器启动的上下文
/// 包括缓存、上游 fetcher 和审计记录
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let cache_handle =
        create_lookup_cache(&config.cache).context("Failed to create lookup cache")?;

    let recorder_handle = create_recorder(&config.database)
        .await
        .context("Failed to initialize lookup recorder")?;
    info!("Using recorder: {}", recorder_handle.recorder.name());

    let fetcher = Fetcher::from_config(&config.upstream);
    info!(
        "Upstream: {} (max {} attempts, timeout {:?})",
        config.upstream.endpoint,
        fetcher.policy().max_attempts(),
        config.upstream.request_timeout()
    );

    let service = Arc::new(LookupService::new(
        cache_handle.cache.clone(),
        Arc::new(fetcher),
        recorder_handle.recorder,
    ));

    debug!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        service,
        cache_handle,
        database: recorder_handle.database,
    })
}
