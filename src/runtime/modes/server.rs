//! Server mode
//!
//! Wires the lookup service into actix-web and runs until Ctrl+C.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::services::{AppStartTime, cache_routes, health_routes, lookup_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// 1. Records startup time
/// 2. Builds cache, recorder and lookup service
/// 3. Serves until the server stops or Ctrl+C arrives
/// 4. Stops the sweeper and closes the database
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();
    let config = get_config();

    let startup = lifetime::startup::prepare_server_startup(&config).await?;
    let lifetime::startup::StartupContext {
        service,
        mut cache_handle,
        database,
    } = startup;

    let cpu_count = config.server.cpu_count.max(1);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .service(lookup_routes())
            .service(cache_routes())
            .service(health_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .disable_signals()
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let server_handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            server_handle.stop(true).await;
            warn!("HTTP server stopped");
        }
    }

    lifetime::shutdown::perform_shutdown(&mut cache_handle, database).await;
    warn!("Graceful shutdown: all tasks completed");

    Ok(())
}
