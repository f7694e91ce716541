//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders, from_fn},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::middleware::request_id;
use crate::api::services::{
    AppStartTime, admin::routes::admin_v1_routes, dashboard_routes, health_routes,
};
use crate::runtime::lifetime::{self, startup::StartupContext};

/// 请求体上限（记录 JSON 很小）
const MAX_PAYLOAD_BYTES: usize = 256 * 1024;

/// 注册全部路由和共享数据
///
/// - `/api/v1/dashboard` 看板只读接口
/// - `/admin/v1` 记录管理
/// - `/health` 健康检查
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    context: &StartupContext,
    app_start_time: &AppStartTime,
) {
    cfg.app_data(web::Data::new(context.repo.clone()))
        .app_data(web::Data::new(context.cache.clone()))
        .app_data(web::Data::new(context.dashboard.clone()))
        .app_data(web::Data::new(context.records.clone()))
        .app_data(web::Data::new(app_start_time.clone()))
        .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
        .service(web::scope("/api/v1").service(dashboard_routes()))
        .service(web::scope("/admin").service(admin_v1_routes()))
        .service(web::scope("/health").service(health_routes()));
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let context = lifetime::startup::prepare_startup()
        .await
        .inspect_err(|e| error!("Server startup failed: {:#}", e))?;

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(request_id))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_app(cfg, &context, &app_start_time))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res.context("HTTP server exited with error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
