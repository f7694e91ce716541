use async_trait::async_trait;

use super::traits::{DashboardView, Generation, ViewCache, ViewKey};
use crate::storage::models::RecordKind;

/// 不缓存：每次请求都重新计算
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewCache;

#[async_trait]
impl ViewCache for NullViewCache {
    fn name(&self) -> &'static str {
        "none"
    }

    fn generation(&self) -> Generation {
        Generation::default()
    }

    async fn get(&self, _key: &ViewKey) -> Option<DashboardView> {
        None
    }

    async fn insert(&self, _key: ViewKey, _view: DashboardView, _seen: Generation) -> bool {
        false
    }

    async fn invalidate_kind(&self, _kind: RecordKind) {}
}
