use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{self, ViewCache};
use crate::services::{DashboardService, RecordService};
use crate::storage::{RecordRepository, StorageFactory};

/// 启动后共享的依赖，显式注入到各服务和 HTTP handler
#[derive(Clone)]
pub struct StartupContext {
    pub repo: Arc<dyn RecordRepository>,
    pub cache: Arc<dyn ViewCache>,
    pub dashboard: Arc<DashboardService>,
    pub records: Arc<RecordService>,
}

impl StartupContext {
    /// 由已创建的仓储和缓存组装服务（测试中也直接使用）
    pub fn from_parts(repo: Arc<dyn RecordRepository>, cache: Arc<dyn ViewCache>) -> Self {
        let dashboard = Arc::new(DashboardService::new(repo.clone(), cache.clone()));
        let records = Arc::new(RecordService::new(repo.clone(), cache.clone()));
        Self {
            repo,
            cache,
            dashboard,
            records,
        }
    }
}

/// 准备启动上下文：存储、缓存和服务
pub async fn prepare_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // 重复安装会返回 Err，CLI 模式下可能已经安装过
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let repo = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", repo.backend_name());

    let config = crate::config::get_config();
    let cache = cache::create_view_cache(&config.cache);

    let context = StartupContext::from_parts(repo, cache);
    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());
    Ok(context)
}
