//! 根据配置创建缓存后端

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::memory::MemoryLookupCache;
use super::moka::MokaLookupCache;
use super::null::NullLookupCache;
use super::traits::LookupCache;
use crate::config::CacheConfig;
use crate::errors::{GeoLookupError, Result};

/// Names accepted by `cache.type`
pub const CACHE_BACKENDS: &[&str] = &["memory", "moka", "none"];

/// 缓存实例及其后台清理任务（仅 memory 后端有）
pub struct CacheHandle {
    pub cache: Arc<dyn LookupCache>,
    pub sweeper: Option<JoinHandle<()>>,
}

impl CacheHandle {
    /// 停止后台清理任务
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

/// Build the backend named by `cache.type`
///
/// Must be called inside a tokio runtime when the memory backend has a
/// sweep interval configured.
pub fn create_lookup_cache(config: &CacheConfig) -> Result<CacheHandle> {
    let ttl = config.ttl();

    let handle = match config.cache_type.as_str() {
        "memory" => {
            let cache = Arc::new(MemoryLookupCache::new(ttl));
            let sweeper = config
                .sweep_interval()
                .map(|interval| cache.spawn_sweeper(interval));
            CacheHandle {
                cache,
                sweeper,
            }
        }
        "moka" => CacheHandle {
            cache: Arc::new(MokaLookupCache::new(ttl, config.max_capacity)),
            sweeper: None,
        },
        "none" => {
            warn!("Lookup cache disabled, every request goes upstream");
            CacheHandle {
                cache: Arc::new(NullLookupCache::new()),
                sweeper: None,
            }
        }
        other => {
            return Err(GeoLookupError::config(format!(
                "Unknown cache type '{}'. Valid: {}",
                other,
                CACHE_BACKENDS.join(", ")
            )));
        }
    };

    info!(
        "Lookup cache: {} backend, TTL {:?}",
        handle.cache.name(),
        ttl
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_each_backend() {
        for name in CACHE_BACKENDS {
            let config = CacheConfig {
                cache_type: name.to_string(),
                ..Default::default()
            };
            let mut handle = create_lookup_cache(&config).unwrap();
            assert_eq!(handle.cache.name(), *name);
            assert_eq!(handle.sweeper.is_some(), *name == "memory");
            handle.shutdown();
        }
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected() {
        let config = CacheConfig {
            cache_type: "redis".to_string(),
            ..Default::default()
        };
        let err = create_lookup_cache(&config).err().unwrap();
        assert!(matches!(err, GeoLookupError::Config(_)));
    }

    #[tokio::test]
    async fn test_memory_without_sweeper() {
        let config = CacheConfig {
            sweep_interval_secs: 0,
            ttl_secs: 30,
            ..Default::default()
        };
        let handle = create_lookup_cache(&config).unwrap();
        assert!(handle.sweeper.is_none());
        assert_eq!(handle.cache.ttl(), std::time::Duration::from_secs(30));
    }
}
