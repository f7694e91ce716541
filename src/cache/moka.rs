use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::traits::{DashboardView, Generation, GenerationCounter, ViewCache, ViewKey};
use crate::config::CacheConfig;
use crate::storage::models::RecordKind;

/// moka 视图缓存（TTL + 容量上限）
pub struct MokaViewCache {
    inner: Cache<ViewKey, DashboardView>,
    generations: GenerationCounter,
}

impl MokaViewCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "MokaViewCache initialized with max capacity: {}, TTL: {}s",
            config.max_capacity, config.default_ttl
        );
        Self {
            inner,
            generations: GenerationCounter::default(),
        }
    }
}

#[async_trait]
impl ViewCache for MokaViewCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn generation(&self) -> Generation {
        self.generations.snapshot()
    }

    async fn get(&self, key: &ViewKey) -> Option<DashboardView> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: ViewKey, view: DashboardView, seen: Generation) -> bool {
        if seen.changed_for(&self.generations.snapshot(), &key) {
            debug!("Discarding view computed before a write: {:?}", key);
            return false;
        }
        self.inner.insert(key.clone(), view).await;

        // invalidate_kind 先递增计数再清理；写入与清理交错时在这里撤回
        if seen.changed_for(&self.generations.snapshot(), &key) {
            self.inner.invalidate(&key).await;
            debug!("Withdrew view raced by a write: {:?}", key);
            return false;
        }
        true
    }

    async fn invalidate_kind(&self, kind: RecordKind) {
        self.generations.bump(kind);
        // 键空间很小（每个视图一项，外加不同日期范围和搜索词），直接遍历
        let stale: Vec<ViewKey> = self
            .inner
            .iter()
            .filter(|(key, _)| key.depends_on(kind))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in &stale {
            self.inner.invalidate(key).await;
        }
        debug!("Invalidated {} cached views for {}", stale.len(), kind);
    }
}
