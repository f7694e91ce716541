//! In-process record storage
//!
//! Used when `database_url = "memory"` and by tests that want a repository
//! without a database. Rows come back newest date first, same as the SQL
//! backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::{DashboardError, Result};
use crate::storage::RecordRepository;
use crate::storage::models::{
    AdSpendRecord, CallInquiryRecord, CampaignRef, RecordKind, RecordQuery,
};

#[derive(Default)]
struct Tables {
    ad_spend: BTreeMap<String, AdSpendRecord>,
    call_inquiries: BTreeMap<String, CallInquiryRecord>,
}

/// 内存存储
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    // 测试用：模拟后端不可用
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置数据
    pub fn with_records(ads: Vec<AdSpendRecord>, calls: Vec<CallInquiryRecord>) -> Self {
        let tables = Tables {
            ad_spend: ads.into_iter().map(|r| (r.id.clone(), r)).collect(),
            call_inquiries: calls.into_iter().map(|r| (r.id.clone(), r)).collect(),
        };
        Self {
            tables: RwLock::new(tables),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 切换为不可用状态，之后所有操作返回 DataAccess 错误
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DashboardError::data_access("memory storage marked unavailable"));
        }
        Ok(())
    }
}

fn not_found(kind: RecordKind, id: &str) -> DashboardError {
    DashboardError::not_found(format!("{} 记录不存在: {}", kind, id))
}

fn duplicate(kind: RecordKind, id: &str) -> DashboardError {
    DashboardError::data_access(format!("{} 记录已存在: {}", kind, id))
}

#[async_trait]
impl RecordRepository for MemoryStorage {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn fetch_ad_spend(&self, query: RecordQuery) -> Result<Vec<AdSpendRecord>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<AdSpendRecord> = tables
            .ad_spend
            .values()
            .filter(|r| query.matches(r.date, r.deleted_at))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn fetch_call_inquiries(&self, query: RecordQuery) -> Result<Vec<CallInquiryRecord>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<CallInquiryRecord> = tables
            .call_inquiries
            .values()
            .filter(|r| query.matches(r.date, r.deleted_at))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn fetch_all_campaign_names(&self) -> Result<Vec<CampaignRef>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(crate::storage::distinct_campaigns(
            tables.ad_spend.values().filter(|r| !r.is_deleted()),
        ))
    }

    async fn get_ad_spend(&self, id: &str) -> Result<Option<AdSpendRecord>> {
        self.check_available()?;
        Ok(self.tables.read().await.ad_spend.get(id).cloned())
    }

    async fn get_call_inquiry(&self, id: &str) -> Result<Option<CallInquiryRecord>> {
        self.check_available()?;
        Ok(self.tables.read().await.call_inquiries.get(id).cloned())
    }

    async fn insert_ad_spend(&self, record: &AdSpendRecord) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.ad_spend.contains_key(&record.id) {
            return Err(duplicate(RecordKind::AdSpend, &record.id));
        }
        tables.ad_spend.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn insert_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.call_inquiries.contains_key(&record.id) {
            return Err(duplicate(RecordKind::CallInquiry, &record.id));
        }
        tables
            .call_inquiries
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update_ad_spend(&self, record: &AdSpendRecord) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        match tables.ad_spend.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(not_found(RecordKind::AdSpend, &record.id)),
        }
    }

    async fn update_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        match tables.call_inquiries.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(not_found(RecordKind::CallInquiry, &record.id)),
        }
    }

    async fn set_deleted_at(
        &self,
        kind: RecordKind,
        id: &str,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let slot = match kind {
            RecordKind::AdSpend => tables.ad_spend.get_mut(id).map(|r| &mut r.deleted_at),
            RecordKind::CallInquiry => tables
                .call_inquiries
                .get_mut(id)
                .map(|r| &mut r.deleted_at),
        };
        match slot {
            Some(slot) => {
                *slot = deleted_at;
                Ok(())
            }
            None => Err(not_found(kind, id)),
        }
    }

    async fn hard_delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let removed = match kind {
            RecordKind::AdSpend => tables.ad_spend.remove(id).is_some(),
            RecordKind::CallInquiry => tables.call_inquiries.remove(id).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(not_found(kind, id))
        }
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
