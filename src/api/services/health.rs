use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace, warn};

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::{HealthCacheCheck, HealthChecks, HealthRecorderCheck, HealthResponse};
use crate::errors::GeoLookupError;
use crate::services::LookupService;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    /// 就绪检查：缓存可计数即视为健康，`none` 后端的 CacheUnavailable 不算失败
    pub async fn readiness_check(
        service: web::Data<Arc<LookupService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received readiness check request");

        let cache = service.cache();
        let base = HealthCacheCheck {
            status: "healthy".to_string(),
            backend: cache.name().to_string(),
            entries: None,
            ttl_secs: cache.ttl().as_secs(),
            error: None,
        };

        let cache_check = match tokio::time::timeout(Duration::from_secs(5), cache.count()).await
        {
            Ok(Ok(count)) => HealthCacheCheck {
                entries: Some(count),
                ..base
            },
            Ok(Err(GeoLookupError::CacheUnavailable(msg))) => HealthCacheCheck {
                status: "disabled".to_string(),
                error: Some(msg),
                ..base
            },
            Ok(Err(e)) => {
                error!("Cache health check failed: {}", e);
                HealthCacheCheck {
                    status: "unhealthy".to_string(),
                    error: Some(e.to_string()),
                    ..base
                }
            }
            Err(_) => {
                error!("Cache health check timeout");
                HealthCacheCheck {
                    status: "unhealthy".to_string(),
                    error: Some("timeout".to_string()),
                    ..base
                }
            }
        };

        let recorder = service.recorder();
        let recorder_base = HealthRecorderCheck {
            status: "healthy".to_string(),
            backend: recorder.name().to_string(),
            records: None,
            error: None,
        };
        let recorder_check =
            match tokio::time::timeout(Duration::from_secs(5), recorder.stored_count()).await {
                Ok(Ok(Some(records))) => HealthRecorderCheck {
                    records: Some(records),
                    ..recorder_base
                },
                Ok(Ok(None)) => HealthRecorderCheck {
                    status: "disabled".to_string(),
                    ..recorder_base
                },
                Ok(Err(e)) => {
                    warn!("Recorder health check failed: {}", e);
                    HealthRecorderCheck {
                        status: "degraded".to_string(),
                        error: Some(e.to_string()),
                        ..recorder_base
                    }
                }
                Err(_) => {
                    warn!("Recorder health check timeout");
                    HealthRecorderCheck {
                        status: "degraded".to_string(),
                        error: Some("timeout".to_string()),
                        ..recorder_base
                    }
                }
            };

        // 记录失败不影响查询，只有缓存决定就绪状态
        let is_healthy = cache_check.status != "unhealthy";
        let now = chrono::Utc::now();

        let health = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            checks: HealthChecks {
                cache: cache_check,
                recorder: recorder_check,
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        if is_healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(health))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(health),
            )
        }
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
