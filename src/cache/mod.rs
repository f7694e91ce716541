pub mod moka;
pub mod null;
pub mod traits;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::CacheConfig;

pub use self::moka::MokaViewCache;
pub use null::NullViewCache;
pub use traits::{DashboardView, Generation, GenerationCounter, ViewCache, ViewKey};

/// 根据配置创建视图缓存，未知类型回退到内存缓存
pub fn create_view_cache(config: &CacheConfig) -> Arc<dyn ViewCache> {
    let cache: Arc<dyn ViewCache> = match config.cache_type.as_str() {
        "memory" => Arc::new(MokaViewCache::new(config)),
        "none" => Arc::new(NullViewCache),
        other => {
            warn!("Unknown cache type '{}', falling back to memory", other);
            Arc::new(MokaViewCache::new(config))
        }
    };
    info!("View cache: {}", cache.name());
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory() {
        let mut config = CacheConfig::default();
        assert_eq!(create_view_cache(&config).name(), "memory");
        config.cache_type = "none".to_string();
        assert_eq!(create_view_cache(&config).name(), "none");
        config.cache_type = "redis".to_string();
        assert_eq!(create_view_cache(&config).name(), "memory");
    }
}
