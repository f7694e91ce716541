use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C
///
/// 视图缓存只是派生数据，写操作都已同步落库，关闭时无需额外刷新。
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}
