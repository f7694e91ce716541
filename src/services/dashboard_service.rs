//! Dashboard read service
//!
//! Fetches rows through the repository, runs the pure engines and memoizes
//! the results in the view cache. Independent repository reads are issued
//! concurrently and joined before any computation starts.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::analytics::{
    self, CallAnalytics, CampaignPerformance, ForecastProjection, ForecastState, FunnelReport,
    OverviewStats, SearchResults,
};
use crate::cache::{DashboardView, ViewCache, ViewKey};
use crate::errors::Result;
use crate::storage::{
    AdSpendRecord, CallInquiryRecord, CampaignRef, DateRange, RecordQuery, RecordRepository,
};

/// 全部看板区块（日期范围只作用于 overview）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub overview: OverviewStats,
    pub campaigns: Vec<CampaignPerformance>,
    pub calls: CallAnalytics,
    pub funnel: FunnelReport,
    pub forecast: ForecastState,
}

pub struct DashboardService {
    repo: Arc<dyn RecordRepository>,
    cache: Arc<dyn ViewCache>,
}

impl DashboardService {
    pub fn new(repo: Arc<dyn RecordRepository>, cache: Arc<dyn ViewCache>) -> Self {
        Self { repo, cache }
    }

    /// 并发读取两类记录
    async fn fetch_rows(
        &self,
        query: RecordQuery,
    ) -> Result<(Vec<AdSpendRecord>, Vec<CallInquiryRecord>)> {
        tokio::try_join!(
            self.repo.fetch_ad_spend(query),
            self.repo.fetch_call_inquiries(query)
        )
        .inspect_err(|e| error!("Dashboard read failed: {}", e))
    }

    async fn cached<T, Fut>(
        &self,
        key: ViewKey,
        unwrap: fn(DashboardView) -> Option<T>,
        wrap: fn(T) -> DashboardView,
        compute: Fut,
    ) -> Result<T>
    where
        T: Clone,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(view) = self.cache.get(&key).await
            && let Some(hit) = unwrap(view)
        {
            debug!("View cache hit: {:?}", key);
            return Ok(hit);
        }

        let seen = self.cache.generation();
        let value = compute.await?;
        self.cache.insert(key, wrap(value.clone()), seen).await;
        Ok(value)
    }

    /// Overview stats over rows inside `range` (inclusive, open ends unbounded).
    pub async fn overview(&self, range: DateRange) -> Result<OverviewStats> {
        self.cached(
            ViewKey::Overview(range),
            |v| match v {
                DashboardView::Overview(s) => Some(s),
                _ => None,
            },
            DashboardView::Overview,
            async {
                let (ads, calls) = self.fetch_rows(RecordQuery::in_range(range)).await?;
                Ok(analytics::overview_stats(&ads, &calls))
            },
        )
        .await
    }

    pub async fn campaign_performance(&self) -> Result<Vec<CampaignPerformance>> {
        self.cached(
            ViewKey::Campaigns,
            |v| match v {
                DashboardView::Campaigns(c) => Some(c),
                _ => None,
            },
            DashboardView::Campaigns,
            async {
                let ads = self
                    .repo
                    .fetch_ad_spend(RecordQuery::active())
                    .await
                    .inspect_err(|e| error!("Dashboard read failed: {}", e))?;
                Ok(analytics::campaign_performance(&ads))
            },
        )
        .await
    }

    pub async fn call_analytics(&self) -> Result<CallAnalytics> {
        self.cached(
            ViewKey::Calls,
            |v| match v {
                DashboardView::Calls(c) => Some(c),
                _ => None,
            },
            DashboardView::Calls,
            async {
                let calls = self
                    .repo
                    .fetch_call_inquiries(RecordQuery::active())
                    .await
                    .inspect_err(|e| error!("Dashboard read failed: {}", e))?;
                Ok(analytics::call_analytics(&calls))
            },
        )
        .await
    }

    pub async fn funnel(&self) -> Result<FunnelReport> {
        self.cached(
            ViewKey::Funnel,
            |v| match v {
                DashboardView::Funnel(f) => Some(f),
                _ => None,
            },
            DashboardView::Funnel,
            async {
                let (ads, calls) = self.fetch_rows(RecordQuery::active()).await?;
                Ok(FunnelReport::from_steps(analytics::funnel(&ads, &calls)))
            },
        )
        .await
    }

    pub async fn forecast(&self) -> Result<ForecastState> {
        self.cached(
            ViewKey::Forecast,
            |v| match v {
                DashboardView::Forecast(f) => Some(f),
                _ => None,
            },
            DashboardView::Forecast,
            async {
                let (ads, calls) = self.fetch_rows(RecordQuery::active()).await?;
                Ok(analytics::forecast_state(&ads, &calls))
            },
        )
        .await
    }

    /// Linear projection for `target_clients`; a Validation error when the
    /// forecast is locked or the target is zero.
    pub async fn projection(&self, target_clients: u64) -> Result<ForecastProjection> {
        let state = self.forecast().await?;
        analytics::project(&state, target_clients)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchResults::default());
        }

        self.cached(
            ViewKey::Search(needle.clone()),
            |v| match v {
                DashboardView::Search(s) => Some(s),
                _ => None,
            },
            DashboardView::Search,
            async {
                let (ads, calls) = self.fetch_rows(RecordQuery::active()).await?;
                Ok(analytics::search(&needle, &ads, &calls))
            },
        )
        .await
    }

    /// 表单下拉框使用的 campaign 列表
    pub async fn campaign_names(&self) -> Result<Vec<CampaignRef>> {
        self.cached(
            ViewKey::CampaignNames,
            |v| match v {
                DashboardView::CampaignNames(c) => Some(c),
                _ => None,
            },
            DashboardView::CampaignNames,
            async {
                self.repo
                    .fetch_all_campaign_names()
                    .await
                    .inspect_err(|e| error!("Campaign list read failed: {}", e))
            },
        )
        .await
    }

    /// All five sections, computed concurrently.
    pub async fn dashboard(&self, range: DateRange) -> Result<DashboardSnapshot> {
        self.cached(
            ViewKey::Dashboard(range),
            |v| match v {
                DashboardView::Dashboard(d) => Some(*d),
                _ => None,
            },
            |d| DashboardView::Dashboard(Box::new(d)),
            async {
                let (overview, campaigns, calls, funnel, forecast) = tokio::try_join!(
                    self.overview(range),
                    self.campaign_performance(),
                    self.call_analytics(),
                    self.funnel(),
                    self.forecast()
                )?;
                Ok(DashboardSnapshot {
                    overview,
                    campaigns,
                    calls,
                    funnel,
                    forecast,
                })
            },
        )
        .await
    }
}
