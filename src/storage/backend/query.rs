//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::{model_to_ad_spend, model_to_call_inquiry};
use super::retry;
use crate::errors::{DashboardError, Result};
use crate::storage::models::{AdSpendRecord, CallInquiryRecord, RecordQuery, format_day};

use migration::entities::{ad_spend, call_inquiry};

/// 将查询条件转换为 SQL 条件（日期列为固定宽度字符串，字符串比较即日期比较）
fn ad_spend_condition(query: &RecordQuery) -> Condition {
    let mut cond = Condition::all();
    if !query.include_deleted {
        cond = cond.add(ad_spend::Column::DeletedAt.is_null());
    }
    if let Some(from) = query.range.from {
        cond = cond.add(ad_spend::Column::Date.gte(format_day(from)));
    }
    if let Some(to) = query.range.to {
        cond = cond.add(ad_spend::Column::Date.lte(format_day(to)));
    }
    cond
}

fn call_inquiry_condition(query: &RecordQuery) -> Condition {
    let mut cond = Condition::all();
    if !query.include_deleted {
        cond = cond.add(call_inquiry::Column::DeletedAt.is_null());
    }
    if let Some(from) = query.range.from {
        cond = cond.add(call_inquiry::Column::Date.gte(format_day(from)));
    }
    if let Some(to) = query.range.to {
        cond = cond.add(call_inquiry::Column::Date.lte(format_day(to)));
    }
    cond
}

fn read_failed(what: &str, e: sea_orm::DbErr) -> DashboardError {
    error!("{} 查询失败（重试后仍失败）: {}", what, e);
    DashboardError::data_access(format!("读取 {} 失败: {}", what, e))
}

impl SeaOrmStorage {
    pub(super) async fn query_ad_spend(&self, query: RecordQuery) -> Result<Vec<AdSpendRecord>> {
        let db = &self.db;
        let cond = ad_spend_condition(&query);

        let models = retry::with_retry("fetch_ad_spend", self.retry_policy, || async {
            ad_spend::Entity::find()
                .filter(cond.clone())
                .order_by_desc(ad_spend::Column::Date)
                .order_by_asc(ad_spend::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| read_failed("ad_spend", e))?;

        debug!("Fetched {} ad_spend rows", models.len());
        models.into_iter().map(model_to_ad_spend).collect()
    }

    pub(super) async fn query_call_inquiries(
        &self,
        query: RecordQuery,
    ) -> Result<Vec<CallInquiryRecord>> {
        let db = &self.db;
        let cond = call_inquiry_condition(&query);

        let models = retry::with_retry("fetch_call_inquiries", self.retry_policy, || async {
            call_inquiry::Entity::find()
                .filter(cond.clone())
                .order_by_desc(call_inquiry::Column::Date)
                .order_by_asc(call_inquiry::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| read_failed("call_inquiries", e))?;

        debug!("Fetched {} call_inquiries rows", models.len());
        models.into_iter().map(model_to_call_inquiry).collect()
    }

    pub(super) async fn find_ad_spend(&self, id: &str) -> Result<Option<AdSpendRecord>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_ad_spend({})", id), self.retry_policy, || {
            let id = id_owned.clone();
            async move { ad_spend::Entity::find_by_id(id).one(db).await }
        })
        .await
        .map_err(|e| read_failed("ad_spend", e))?;

        model.map(model_to_ad_spend).transpose()
    }

    pub(super) async fn find_call_inquiry(&self, id: &str) -> Result<Option<CallInquiryRecord>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(
            &format!("get_call_inquiry({})", id),
            self.retry_policy,
            || {
                let id = id_owned.clone();
                async move { call_inquiry::Entity::find_by_id(id).one(db).await }
            },
        )
        .await
        .map_err(|e| read_failed("call_inquiries", e))?;

        model.map(model_to_call_inquiry).transpose()
    }

    pub(super) async fn check_connection(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| DashboardError::data_access(format!("数据库不可用: {}", e)))
    }
}
