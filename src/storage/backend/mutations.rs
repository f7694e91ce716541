//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations and the
//! `RecordRepository` impl that ties reads and writes together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, sea_query::Expr};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{ad_spend_to_active_model, call_inquiry_to_active_model};
use super::retry;
use crate::errors::{DashboardError, Result};
use crate::storage::RecordRepository;
use crate::storage::models::{
    AdSpendRecord, CallInquiryRecord, CampaignRef, RecordKind, RecordQuery,
};

use migration::entities::{ad_spend, call_inquiry};

fn write_failed(action: &str, kind: RecordKind, id: &str, e: DbErr) -> DashboardError {
    match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            DashboardError::not_found(format!("{} 记录不存在: {}", kind, id))
        }
        other => DashboardError::data_access(format!("{} {} 失败: {}", action, kind, other)),
    }
}

fn ensure_affected(rows_affected: u64, kind: RecordKind, id: &str) -> Result<()> {
    if rows_affected == 0 {
        return Err(DashboardError::not_found(format!(
            "{} 记录不存在: {}",
            kind, id
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    async fn insert_ad_spend_row(&self, record: &AdSpendRecord) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("insert_ad_spend({})", record.id),
            self.retry_policy,
            || async {
                ad_spend::Entity::insert(ad_spend_to_active_model(record))
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| write_failed("插入", RecordKind::AdSpend, &record.id, e))
    }

    async fn insert_call_inquiry_row(&self, record: &CallInquiryRecord) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("insert_call_inquiry({})", record.id),
            self.retry_policy,
            || async {
                call_inquiry::Entity::insert(call_inquiry_to_active_model(record))
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| write_failed("插入", RecordKind::CallInquiry, &record.id, e))
    }

    async fn update_ad_spend_row(&self, record: &AdSpendRecord) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("update_ad_spend({})", record.id),
            self.retry_policy,
            || async {
                ad_spend::Entity::update(ad_spend_to_active_model(record))
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| write_failed("更新", RecordKind::AdSpend, &record.id, e))
    }

    async fn update_call_inquiry_row(&self, record: &CallInquiryRecord) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("update_call_inquiry({})", record.id),
            self.retry_policy,
            || async {
                call_inquiry::Entity::update(call_inquiry_to_active_model(record))
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| write_failed("更新", RecordKind::CallInquiry, &record.id, e))
    }

    async fn mark_deleted(
        &self,
        kind: RecordKind,
        id: &str,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry(
            &format!("set_deleted_at({}, {})", kind, id),
            self.retry_policy,
            || {
                let id = id_owned.clone();
                async move {
                    match kind {
                        RecordKind::AdSpend => {
                            ad_spend::Entity::update_many()
                                .col_expr(ad_spend::Column::DeletedAt, Expr::value(deleted_at))
                                .filter(ad_spend::Column::Id.eq(id))
                                .exec(db)
                                .await
                        }
                        RecordKind::CallInquiry => {
                            call_inquiry::Entity::update_many()
                                .col_expr(
                                    call_inquiry::Column::DeletedAt,
                                    Expr::value(deleted_at),
                                )
                                .filter(call_inquiry::Column::Id.eq(id))
                                .exec(db)
                                .await
                        }
                    }
                }
            },
        )
        .await
        .map_err(|e| write_failed("软删除", kind, id, e))?;

        ensure_affected(result.rows_affected, kind, id)
    }

    async fn delete_row(&self, kind: RecordKind, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry(
            &format!("hard_delete({}, {})", kind, id),
            self.retry_policy,
            || {
                let id = id_owned.clone();
                async move {
                    match kind {
                        RecordKind::AdSpend => ad_spend::Entity::delete_by_id(id).exec(db).await,
                        RecordKind::CallInquiry => {
                            call_inquiry::Entity::delete_by_id(id).exec(db).await
                        }
                    }
                }
            },
        )
        .await
        .map_err(|e| write_failed("删除", kind, id, e))?;

        ensure_affected(result.rows_affected, kind, id)?;
        info!("{} record permanently deleted: {}", kind, id);
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for SeaOrmStorage {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn fetch_ad_spend(&self, query: RecordQuery) -> Result<Vec<AdSpendRecord>> {
        self.query_ad_spend(query).await
    }

    async fn fetch_call_inquiries(&self, query: RecordQuery) -> Result<Vec<CallInquiryRecord>> {
        self.query_call_inquiries(query).await
    }

    async fn fetch_all_campaign_names(&self) -> Result<Vec<CampaignRef>> {
        let rows = self.query_ad_spend(RecordQuery::active()).await?;
        Ok(crate::storage::distinct_campaigns(&rows))
    }

    async fn get_ad_spend(&self, id: &str) -> Result<Option<AdSpendRecord>> {
        self.find_ad_spend(id).await
    }

    async fn get_call_inquiry(&self, id: &str) -> Result<Option<CallInquiryRecord>> {
        self.find_call_inquiry(id).await
    }

    async fn insert_ad_spend(&self, record: &AdSpendRecord) -> Result<()> {
        self.insert_ad_spend_row(record).await
    }

    async fn insert_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()> {
        self.insert_call_inquiry_row(record).await
    }

    async fn update_ad_spend(&self, record: &AdSpendRecord) -> Result<()> {
        self.update_ad_spend_row(record).await
    }

    async fn update_call_inquiry(&self, record: &CallInquiryRecord) -> Result<()> {
        self.update_call_inquiry_row(record).await
    }

    async fn set_deleted_at(
        &self,
        kind: RecordKind,
        id: &str,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.mark_deleted(kind, id, deleted_at).await
    }

    async fn hard_delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        self.delete_row(kind, id).await
    }

    async fn ping(&self) -> Result<()> {
        self.check_connection().await
    }
}
