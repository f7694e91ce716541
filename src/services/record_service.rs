//! Record mutation gateway
//!
//! Admin writes go through here. Field maps are decoded into strict typed
//! payloads, validated, and only then handed to the repository. Every
//! successful write invalidates the cached views built from that collection.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::ViewCache;
use crate::errors::{DashboardError, Result};
use crate::storage::models::parse_day;
use crate::storage::{
    AdSpendRecord, CallInquiryRecord, CallType, Language, RecordKind, RecordQuery,
    RecordRepository,
};

// ============ Request payloads ============

/// 广告投放字段（创建时必填项缺失会报错，更新时为部分字段）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdSpendFields {
    pub date: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub amount_spent: Option<f64>,
    pub impressions: Option<u64>,
    pub reach: Option<u64>,
    pub link_clicks: Option<u64>,
    pub results: Option<u64>,
    pub glitch_noted: Option<bool>,
    /// 更新时传空字符串表示清除
    pub glitch_details: Option<String>,
}

/// 通话咨询字段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallInquiryFields {
    pub date: Option<String>,
    pub call_type: Option<String>,
    pub language: Option<String>,
    pub country_name: Option<String>,
    pub iso_code: Option<String>,
    pub dialing_code: Option<String>,
    pub total_calls: Option<u64>,
    pub quotation_sent: Option<u64>,
    pub wins: Option<u64>,
}

/// 管理端返回的记录（两个集合共用）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredRecord {
    AdSpend(AdSpendRecord),
    CallInquiry(CallInquiryRecord),
}

// ============ Validation helpers ============

fn decode<T: DeserializeOwned>(kind: RecordKind, fields: Value) -> Result<T> {
    if !fields.is_object() {
        return Err(DashboardError::validation(format!(
            "{} fields must be a JSON object",
            kind
        )));
    }
    serde_json::from_value(fields)
        .map_err(|e| DashboardError::validation(format!("invalid {} fields: {}", kind, e)))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| DashboardError::validation(format!("missing required field '{}'", field)))
}

fn valid_date(raw: &str) -> Result<NaiveDate> {
    parse_day(raw).ok_or_else(|| {
        DashboardError::validation(format!("date must be YYYY-MM-DD, got '{}'", raw))
    })
}

fn non_empty(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation(format!(
            "field '{}' must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

fn valid_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DashboardError::validation(format!(
            "amount_spent must be a finite non-negative number, got {}",
            amount
        )));
    }
    Ok(amount)
}

// 存储列为 BIGINT
fn valid_count(value: u64, field: &str) -> Result<u64> {
    if value > i64::MAX as u64 {
        return Err(DashboardError::validation(format!(
            "field '{}' exceeds the storable range",
            field
        )));
    }
    Ok(value)
}

fn valid_call_type(raw: &str) -> Result<CallType> {
    match raw.parse::<CallType>() {
        Ok(t) if t != CallType::Unrecognized => Ok(t),
        _ => Err(DashboardError::validation(format!(
            "call_type must be 'local' or 'whatsapp', got '{}'",
            raw
        ))),
    }
}

fn valid_language(raw: &str) -> Result<Language> {
    match raw.parse::<Language>() {
        Ok(l) if l != Language::Unrecognized => Ok(l),
        _ => Err(DashboardError::validation(format!(
            "language must be 'english' or 'sinhala', got '{}'",
            raw
        ))),
    }
}

impl AdSpendFields {
    /// 用完整字段构建新记录
    fn into_new_record(self, id: String) -> Result<AdSpendRecord> {
        let record = AdSpendRecord {
            id,
            date: valid_date(&required(self.date, "date")?)?,
            campaign_id: non_empty(required(self.campaign_id, "campaign_id")?, "campaign_id")?,
            campaign_name: non_empty(
                required(self.campaign_name, "campaign_name")?,
                "campaign_name",
            )?,
            amount_spent: valid_amount(required(self.amount_spent, "amount_spent")?)?,
            impressions: valid_count(self.impressions.unwrap_or(0), "impressions")?,
            reach: valid_count(self.reach.unwrap_or(0), "reach")?,
            link_clicks: valid_count(self.link_clicks.unwrap_or(0), "link_clicks")?,
            results: valid_count(self.results.unwrap_or(0), "results")?,
            glitch_noted: self.glitch_noted.unwrap_or(false),
            glitch_details: self.glitch_details.filter(|s| !s.trim().is_empty()),
            created_at: Utc::now(),
            deleted_at: None,
        };
        Ok(record)
    }

    /// 将部分字段应用到已有记录
    fn apply_to(self, record: &mut AdSpendRecord) -> Result<()> {
        if let Some(date) = self.date {
            record.date = valid_date(&date)?;
        }
        if let Some(v) = self.campaign_id {
            record.campaign_id = non_empty(v, "campaign_id")?;
        }
        if let Some(v) = self.campaign_name {
            record.campaign_name = non_empty(v, "campaign_name")?;
        }
        if let Some(v) = self.amount_spent {
            record.amount_spent = valid_amount(v)?;
        }
        if let Some(v) = self.impressions {
            record.impressions = valid_count(v, "impressions")?;
        }
        if let Some(v) = self.reach {
            record.reach = valid_count(v, "reach")?;
        }
        if let Some(v) = self.link_clicks {
            record.link_clicks = valid_count(v, "link_clicks")?;
        }
        if let Some(v) = self.results {
            record.results = valid_count(v, "results")?;
        }
        if let Some(v) = self.glitch_noted {
            record.glitch_noted = v;
        }
        if let Some(v) = self.glitch_details {
            record.glitch_details = Some(v).filter(|s| !s.trim().is_empty());
        }
        Ok(())
    }
}

impl CallInquiryFields {
    fn into_new_record(self, id: String) -> Result<CallInquiryRecord> {
        Ok(CallInquiryRecord {
            id,
            date: valid_date(&required(self.date, "date")?)?,
            call_type: valid_call_type(&required(self.call_type, "call_type")?)?,
            language: valid_language(&required(self.language, "language")?)?,
            country_name: non_empty(required(self.country_name, "country_name")?, "country_name")?,
            iso_code: non_empty(required(self.iso_code, "iso_code")?, "iso_code")?,
            dialing_code: non_empty(required(self.dialing_code, "dialing_code")?, "dialing_code")?,
            total_calls: valid_count(required(self.total_calls, "total_calls")?, "total_calls")?,
            quotation_sent: valid_count(self.quotation_sent.unwrap_or(0), "quotation_sent")?,
            wins: valid_count(self.wins.unwrap_or(0), "wins")?,
            created_at: Utc::now(),
            deleted_at: None,
        })
    }

    fn apply_to(self, record: &mut CallInquiryRecord) -> Result<()> {
        if let Some(date) = self.date {
            record.date = valid_date(&date)?;
        }
        if let Some(v) = self.call_type {
            record.call_type = valid_call_type(&v)?;
        }
        if let Some(v) = self.language {
            record.language = valid_language(&v)?;
        }
        if let Some(v) = self.country_name {
            record.country_name = non_empty(v, "country_name")?;
        }
        if let Some(v) = self.iso_code {
            record.iso_code = non_empty(v, "iso_code")?;
        }
        if let Some(v) = self.dialing_code {
            record.dialing_code = non_empty(v, "dialing_code")?;
        }
        if let Some(v) = self.total_calls {
            record.total_calls = valid_count(v, "total_calls")?;
        }
        if let Some(v) = self.quotation_sent {
            record.quotation_sent = valid_count(v, "quotation_sent")?;
        }
        if let Some(v) = self.wins {
            record.wins = valid_count(v, "wins")?;
        }
        Ok(())
    }
}

// ============ Service ============

pub struct RecordService {
    repo: Arc<dyn RecordRepository>,
    cache: Arc<dyn ViewCache>,
}

impl RecordService {
    pub fn new(repo: Arc<dyn RecordRepository>, cache: Arc<dyn ViewCache>) -> Self {
        Self { repo, cache }
    }

    fn missing(kind: RecordKind, id: &str) -> DashboardError {
        DashboardError::not_found(format!("{} record not found: {}", kind, id))
    }

    /// Create a record from a JSON field map and return its new id.
    pub async fn create(&self, kind: RecordKind, fields: Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();

        match kind {
            RecordKind::AdSpend => {
                let record = decode::<AdSpendFields>(kind, fields)?.into_new_record(id.clone())?;
                self.repo.insert_ad_spend(&record).await?;
            }
            RecordKind::CallInquiry => {
                let record =
                    decode::<CallInquiryFields>(kind, fields)?.into_new_record(id.clone())?;
                self.repo.insert_call_inquiry(&record).await?;
            }
        }

        self.cache.invalidate_kind(kind).await;
        info!("{} record created: {}", kind, id);
        Ok(id)
    }

    /// Apply a partial field patch to an existing record (deleted rows included).
    pub async fn update(&self, kind: RecordKind, id: &str, fields: Value) -> Result<()> {
        match kind {
            RecordKind::AdSpend => {
                let patch = decode::<AdSpendFields>(kind, fields)?;
                let mut record = self
                    .repo
                    .get_ad_spend(id)
                    .await?
                    .ok_or_else(|| Self::missing(kind, id))?;
                patch.apply_to(&mut record)?;
                self.repo.update_ad_spend(&record).await?;
            }
            RecordKind::CallInquiry => {
                let patch = decode::<CallInquiryFields>(kind, fields)?;
                let mut record = self
                    .repo
                    .get_call_inquiry(id)
                    .await?
                    .ok_or_else(|| Self::missing(kind, id))?;
                patch.apply_to(&mut record)?;
                self.repo.update_call_inquiry(&record).await?;
            }
        }

        self.cache.invalidate_kind(kind).await;
        info!("{} record updated: {}", kind, id);
        Ok(())
    }

    /// 软删除：设置 deleted_at = now
    pub async fn soft_delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        self.repo.set_deleted_at(kind, id, Some(Utc::now())).await?;
        self.cache.invalidate_kind(kind).await;
        info!("{} record soft-deleted: {}", kind, id);
        Ok(())
    }

    /// 恢复：清除 deleted_at
    pub async fn restore(&self, kind: RecordKind, id: &str) -> Result<()> {
        self.repo.set_deleted_at(kind, id, None).await?;
        self.cache.invalidate_kind(kind).await;
        info!("{} record restored: {}", kind, id);
        Ok(())
    }

    /// 物理删除，不可恢复
    pub async fn hard_delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        self.repo.hard_delete(kind, id).await?;
        self.cache.invalidate_kind(kind).await;
        warn!("{} record permanently deleted: {}", kind, id);
        Ok(())
    }

    pub async fn get(&self, kind: RecordKind, id: &str) -> Result<StoredRecord> {
        let record = match kind {
            RecordKind::AdSpend => self.repo.get_ad_spend(id).await?.map(StoredRecord::AdSpend),
            RecordKind::CallInquiry => self
                .repo
                .get_call_inquiry(id)
                .await?
                .map(StoredRecord::CallInquiry),
        };
        record.ok_or_else(|| Self::missing(kind, id))
    }

    /// 管理列表，可选包含已软删除的行
    pub async fn list(&self, kind: RecordKind, include_deleted: bool) -> Result<Vec<StoredRecord>> {
        let query = if include_deleted {
            RecordQuery::with_deleted()
        } else {
            RecordQuery::active()
        };

        let records = match kind {
            RecordKind::AdSpend => self
                .repo
                .fetch_ad_spend(query)
                .await?
                .into_iter()
                .map(StoredRecord::AdSpend)
                .collect(),
            RecordKind::CallInquiry => self
                .repo
                .fetch_call_inquiries(query)
                .await?
                .into_iter()
                .map(StoredRecord::CallInquiry)
                .collect(),
        };
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_field_rejected() {
        let err = decode::<AdSpendFields>(
            RecordKind::AdSpend,
            json!({"date": "2024-01-01", "cpc": 3}),
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(ref m) if m.contains("cpc")));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(decode::<CallInquiryFields>(RecordKind::CallInquiry, json!([1, 2])).is_err());
    }

    #[test]
    fn test_negative_count_rejected_by_decoder() {
        let err = decode::<CallInquiryFields>(RecordKind::CallInquiry, json!({"wins": -1}))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[test]
    fn test_new_ad_spend_requires_mandatory_fields() {
        let fields = AdSpendFields {
            date: Some("2024-01-01".into()),
            campaign_id: Some("c1".into()),
            amount_spent: Some(10.0),
            ..Default::default()
        };
        let err = fields.into_new_record("x".into()).unwrap_err();
        assert!(matches!(err, DashboardError::Validation(ref m) if m.contains("campaign_name")));
    }

    #[test]
    fn test_new_ad_spend_defaults_counts() {
        let fields = AdSpendFields {
            date: Some("2024-01-01".into()),
            campaign_id: Some(" c1 ".into()),
            campaign_name: Some("Launch".into()),
            amount_spent: Some(0.0),
            glitch_details: Some("  ".into()),
            ..Default::default()
        };
        let record = fields.into_new_record("x".into()).unwrap();
        assert_eq!(record.campaign_id, "c1");
        assert_eq!(record.impressions, 0);
        assert!(record.glitch_details.is_none());
    }

    #[test]
    fn test_field_validation() {
        assert!(valid_date("2024-13-01").is_err());
        assert!(valid_date("2024-1-01").is_err());
        assert!(valid_amount(-0.01).is_err());
        assert!(valid_amount(f64::INFINITY).is_err());
        assert!(valid_amount(f64::NAN).is_err());
        assert!(valid_count(u64::MAX, "wins").is_err());
        assert!(non_empty("   ".into(), "iso_code").is_err());
        assert!(valid_call_type("sms").is_err());
        assert!(valid_call_type("unrecognized").is_err());
        assert_eq!(valid_language("sinhala").unwrap(), Language::Sinhala);
    }

    #[test]
    fn test_wins_may_exceed_total_calls() {
        let fields = CallInquiryFields {
            date: Some("2024-01-01".into()),
            call_type: Some("local".into()),
            language: Some("english".into()),
            country_name: Some("Sri Lanka".into()),
            iso_code: Some("LK".into()),
            dialing_code: Some("+94".into()),
            total_calls: Some(1),
            wins: Some(5),
            ..Default::default()
        };
        let record = fields.into_new_record("x".into()).unwrap();
        assert_eq!(record.wins, 5);
    }

    #[test]
    fn test_patch_applies_only_given_fields() {
        let mut record = AdSpendFields {
            date: Some("2024-01-01".into()),
            campaign_id: Some("c1".into()),
            campaign_name: Some("Launch".into()),
            amount_spent: Some(5.0),
            ..Default::default()
        }
        .into_new_record("x".into())
        .unwrap();
        let before = record.clone();

        let patch = AdSpendFields {
            campaign_name: Some("Renamed".into()),
            amount_spent: Some(-1.0),
            ..Default::default()
        };
        let mut scratch = record.clone();
        assert!(patch.apply_to(&mut scratch).is_err());
        assert_eq!(record, before);

        AdSpendFields {
            results: Some(4),
            ..Default::default()
        }
        .apply_to(&mut record)
        .unwrap();
        assert_eq!(record.results, 4);
        assert_eq!(record.campaign_name, "Launch");
    }
}
