//! Record storage
//!
//! `RecordRepository` is the narrow contract the services depend on. The
//! engines never see it: they receive rows that were already fetched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{
    AdSpendRecord, CallInquiryRecord, CallType, CampaignRef, DateRange, Language, RecordKind,
    RecordQuery,
};

/// 记录仓储接口
///
/// 读操作失败返回 `DataAccess` 错误，与"零行"严格区分。
/// 写操作在目标 id 不存在时返回 `NotFound`。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// 存储后端名称（用于日志和健康检查）
    fn backend_name(&self) -> &str;

    async fn fetch_ad_spend(&self, query: RecordQuery) -> Result<Vec<AdSpendRecord>>;

    async fn fetch_call_inquiries(&self, query: RecordQuery) -> Result<Vec<CallInquiryRecord>>;

    /// Distinct campaigns over undeleted rows, named after their most recent
    /// row and ordered by name.
    async fn fetch_all_campaign_names(&self) -> Result<Vec<CampaignRef>>;

    /// 按 id 获取（包含已软删除的行）
    async fn get_ad_spend(&self, id: &str) -> Result<Option<AdSpendRecord>>;

    async fn get_call_inquiry(&self, id: &str) -> Result<Option<CallInquiryRecord>>;

    async fn insert_ad_spend(&self, record: &AdSpendRecord) -> Result<()>;

    async fn insert_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()>;

    /// 整行替换
    async fn update_ad_spend(&self, record: &AdSpendRecord) -> Result<()>;

    async fn update_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()>;

    /// 设置或清除软删除时间戳
    async fn set_deleted_at(
        &self,
        kind: RecordKind,
        id: &str,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// 物理删除，不可恢复
    async fn hard_delete(&self, kind: RecordKind, id: &str) -> Result<()>;

    /// 存活探测
    async fn ping(&self) -> Result<()>;
}

/// Deduplicate campaigns by id, keeping the name of the most recent row
/// (later date wins, then the larger name on ties), ordered by name then id.
pub fn distinct_campaigns<'a, I>(rows: I) -> Vec<CampaignRef>
where
    I: IntoIterator<Item = &'a AdSpendRecord>,
{
    let mut latest: std::collections::HashMap<&str, (chrono::NaiveDate, &str)> =
        std::collections::HashMap::new();
    for row in rows {
        let candidate = (row.date, row.campaign_name.as_str());
        latest
            .entry(row.campaign_id.as_str())
            .and_modify(|current| {
                if candidate > *current {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut campaigns: Vec<CampaignRef> = latest
        .into_iter()
        .map(|(id, (_, name))| CampaignRef {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();
    campaigns.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    campaigns
}

pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储后端
    ///
    /// `database_url = "memory"` 使用进程内存储，其余按 URL 推断数据库类型。
    pub async fn create() -> Result<Arc<dyn RecordRepository>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        if database_url == "memory" {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            return Ok(Arc::new(MemoryStorage::new()));
        }

        let backend_type = backend::infer_backend_from_url(database_url)?;
        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
