use std::sync::Arc;

use actix_web::{Responder, web};
use tracing::{info, warn};

use super::helpers::{error_from_lookup, success_response};
use super::types::CacheClearResponse;
use crate::services::LookupService;

pub struct CacheService;

impl CacheService {
    /// `POST /cache/clear`
    pub async fn clear(service: web::Data<Arc<LookupService>>) -> impl Responder {
        match service.clear_cache().await {
            Ok(removed) => {
                info!("Cache cleared, {} entries removed", removed);
                success_response(CacheClearResponse { removed })
            }
            Err(e) => {
                warn!("Cache clear failed: {}", e);
                error_from_lookup(&e)
            }
        }
    }
}

pub fn cache_routes() -> actix_web::Scope {
    web::scope("/cache").route("/clear", web::post().to(CacheService::clear))
}
