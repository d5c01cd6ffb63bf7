use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, trace};

use super::helpers::error_from_lookup;
use crate::services::{LookupService, Provenance};

pub struct LookupHandler;

impl LookupHandler {
    /// `GET /api/lookup/{ipaddress}`
    ///
    /// 成功时直接返回 `{city, region, country}`，
    /// 通过 `X-Cache` / `X-Upstream-Retries` 头暴露来源。
    pub async fn lookup(
        path: web::Path<String>,
        service: web::Data<Arc<LookupService>>,
    ) -> impl Responder {
        let ip = path.into_inner();
        trace!("Received lookup request for {}", ip);

        match service.lookup(&ip).await {
            Ok(outcome) => {
                let mut builder = HttpResponse::Ok();
                match outcome.provenance {
                    Provenance::CacheHit => {
                        builder.insert_header(("X-Cache", "HIT"));
                    }
                    Provenance::Fetched { retry_count } => {
                        builder
                            .insert_header(("X-Cache", "MISS"))
                            .insert_header(("X-Upstream-Retries", retry_count.to_string()));
                    }
                }
                builder.json(outcome.record)
            }
            Err(e) => {
                debug!("Lookup for {} failed: {}", ip, e);
                error_from_lookup(&e)
            }
        }
    }
}

pub fn lookup_routes() -> actix_web::Scope {
    web::scope("/api").route("/lookup/{ipaddress}", web::get().to(LookupHandler::lookup))
}
