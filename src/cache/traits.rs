use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::analytics::{
    CallAnalytics, CampaignPerformance, ForecastState, FunnelReport, OverviewStats, SearchResults,
};
use crate::services::DashboardSnapshot;
use crate::storage::models::{CampaignRef, DateRange, RecordKind};

/// 缓存键：一个看板视图及其参数
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Overview(DateRange),
    Campaigns,
    Calls,
    Funnel,
    Forecast,
    Search(String),
    CampaignNames,
    Dashboard(DateRange),
}

impl ViewKey {
    /// 该视图是否由指定集合的数据计算得出
    pub fn depends_on(&self, kind: RecordKind) -> bool {
        match self {
            ViewKey::Campaigns | ViewKey::CampaignNames => kind == RecordKind::AdSpend,
            ViewKey::Calls => kind == RecordKind::CallInquiry,
            ViewKey::Overview(_)
            | ViewKey::Funnel
            | ViewKey::Forecast
            | ViewKey::Search(_)
            | ViewKey::Dashboard(_) => true,
        }
    }
}

/// 已计算的视图
#[derive(Debug, Clone)]
pub enum DashboardView {
    Overview(OverviewStats),
    Campaigns(Vec<CampaignPerformance>),
    Calls(CallAnalytics),
    Funnel(FunnelReport),
    Forecast(ForecastState),
    Search(SearchResults),
    CampaignNames(Vec<CampaignRef>),
    Dashboard(Box<DashboardSnapshot>),
}

/// 各集合的失效代数快照
///
/// 计算视图前读取一次，写回前再比较：期间有写操作时结果不得进入缓存。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation {
    ad_spend: u64,
    call_inquiry: u64,
}

impl Generation {
    /// `key` 依赖的集合在两次快照之间是否被写过
    pub fn changed_for(&self, later: &Generation, key: &ViewKey) -> bool {
        (key.depends_on(RecordKind::AdSpend) && self.ad_spend != later.ad_spend)
            || (key.depends_on(RecordKind::CallInquiry) && self.call_inquiry != later.call_inquiry)
    }
}

/// 每个集合一个单调递增计数器
#[derive(Debug, Default)]
pub struct GenerationCounter {
    ad_spend: AtomicU64,
    call_inquiry: AtomicU64,
}

impl GenerationCounter {
    pub fn snapshot(&self) -> Generation {
        Generation {
            ad_spend: self.ad_spend.load(Ordering::Acquire),
            call_inquiry: self.call_inquiry.load(Ordering::Acquire),
        }
    }

    pub fn bump(&self, kind: RecordKind) {
        let counter = match kind {
            RecordKind::AdSpend => &self.ad_spend,
            RecordKind::CallInquiry => &self.call_inquiry,
        };
        counter.fetch_add(1, Ordering::AcqRel);
    }
}

/// 看板视图缓存
///
/// 引擎没有增量更新路径，任何写操作都必须让依赖该集合的视图失效。
/// 计算开始后发生的写操作同样会让该次结果作废，见 [`Generation`]。
#[async_trait]
pub trait ViewCache: Send + Sync {
    fn name(&self) -> &'static str;

    /// 当前失效代数，在读取仓储之前获取
    fn generation(&self) -> Generation;

    async fn get(&self, key: &ViewKey) -> Option<DashboardView>;

    /// 仅当 `key` 依赖的集合自 `seen` 以来没有被写过时才写入；返回是否写入
    async fn insert(&self, key: ViewKey, view: DashboardView, seen: Generation) -> bool;

    /// 使依赖 `kind` 集合的所有视图失效
    async fn invalidate_kind(&self, kind: RecordKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies() {
        assert!(ViewKey::Campaigns.depends_on(RecordKind::AdSpend));
        assert!(!ViewKey::Campaigns.depends_on(RecordKind::CallInquiry));
        assert!(!ViewKey::Calls.depends_on(RecordKind::AdSpend));
        assert!(ViewKey::Calls.depends_on(RecordKind::CallInquiry));
        assert!(ViewKey::Forecast.depends_on(RecordKind::AdSpend));
        assert!(ViewKey::Search("x".into()).depends_on(RecordKind::CallInquiry));
        assert!(ViewKey::Dashboard(DateRange::unbounded()).depends_on(RecordKind::AdSpend));
    }

    #[test]
    fn test_generation_change_only_matters_for_dependents() {
        let counter = GenerationCounter::default();
        let before = counter.snapshot();
        counter.bump(RecordKind::CallInquiry);
        let after = counter.snapshot();

        assert!(before.changed_for(&after, &ViewKey::Calls));
        assert!(before.changed_for(&after, &ViewKey::Funnel));
        assert!(!before.changed_for(&after, &ViewKey::Campaigns));
        assert!(!after.changed_for(&counter.snapshot(), &ViewKey::Calls));
    }
}
