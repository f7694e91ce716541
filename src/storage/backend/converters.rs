use crate::errors::{DashboardError, Result};
use crate::storage::models::{
    AdSpendRecord, CallInquiryRecord, CallType, Language, format_day, parse_day,
};
use chrono::NaiveDate;
use migration::entities::{ad_spend, call_inquiry};
use tracing::warn;

fn stored_day(table: &str, id: &str, raw: &str) -> Result<NaiveDate> {
    parse_day(raw).ok_or_else(|| {
        DashboardError::computation(format!("{} 行 {} 的日期无效: {:?}", table, id, raw))
    })
}

// 数据库列是有符号的；负值只可能来自损坏数据
fn stored_count(table: &str, id: &str, column: &str, v: i64) -> Result<u64> {
    u64::try_from(v).map_err(|_| {
        DashboardError::computation(format!("{} 行 {} 的 {} 为负数: {}", table, id, column, v))
    })
}

fn stored_amount(id: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(DashboardError::computation(format!(
            "ad_spend 行 {} 的 amount_spent 无效: {}",
            id, v
        )))
    }
}

fn count_column(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// 将 ad_spend Model 转换为 AdSpendRecord
pub fn model_to_ad_spend(model: ad_spend::Model) -> Result<AdSpendRecord> {
    const T: &str = "ad_spend";
    let date = stored_day(T, &model.id, &model.date)?;
    let amount_spent = stored_amount(&model.id, model.amount_spent)?;
    let impressions = stored_count(T, &model.id, "impressions", model.impressions)?;
    let reach = stored_count(T, &model.id, "reach", model.reach)?;
    let link_clicks = stored_count(T, &model.id, "link_clicks", model.link_clicks)?;
    let results = stored_count(T, &model.id, "results", model.results)?;
    Ok(AdSpendRecord {
        id: model.id,
        date,
        campaign_id: model.campaign_id,
        campaign_name: model.campaign_name,
        amount_spent,
        impressions,
        reach,
        link_clicks,
        results,
        glitch_noted: model.glitch_noted,
        glitch_details: model.glitch_details,
        created_at: model.created_at,
        deleted_at: model.deleted_at,
    })
}

/// 将 call_inquiries Model 转换为 CallInquiryRecord
pub fn model_to_call_inquiry(model: call_inquiry::Model) -> Result<CallInquiryRecord> {
    const T: &str = "call_inquiries";
    let date = stored_day(T, &model.id, &model.date)?;
    let total_calls = stored_count(T, &model.id, "total_calls", model.total_calls)?;
    let quotation_sent = stored_count(T, &model.id, "quotation_sent", model.quotation_sent)?;
    let wins = stored_count(T, &model.id, "wins", model.wins)?;

    let call_type = CallType::from_stored(&model.call_type);
    if call_type == CallType::Unrecognized {
        warn!(
            "call_inquiries row {} has unknown call_type {:?}",
            model.id, model.call_type
        );
    }
    let language = Language::from_stored(&model.language);
    if language == Language::Unrecognized {
        warn!(
            "call_inquiries row {} has unknown language {:?}",
            model.id, model.language
        );
    }

    Ok(CallInquiryRecord {
        id: model.id,
        date,
        call_type,
        language,
        country_name: model.country_name,
        iso_code: model.iso_code,
        dialing_code: model.dialing_code,
        total_calls,
        quotation_sent,
        wins,
        created_at: model.created_at,
        deleted_at: model.deleted_at,
    })
}

/// 将 AdSpendRecord 转换为 ActiveModel（插入与整行更新共用）
pub fn ad_spend_to_active_model(record: &AdSpendRecord) -> ad_spend::ActiveModel {
    use sea_orm::ActiveValue::*;

    ad_spend::ActiveModel {
        id: Set(record.id.clone()),
        date: Set(format_day(record.date)),
        campaign_id: Set(record.campaign_id.clone()),
        campaign_name: Set(record.campaign_name.clone()),
        amount_spent: Set(record.amount_spent),
        impressions: Set(count_column(record.impressions)),
        reach: Set(count_column(record.reach)),
        link_clicks: Set(count_column(record.link_clicks)),
        results: Set(count_column(record.results)),
        glitch_noted: Set(record.glitch_noted),
        glitch_details: Set(record.glitch_details.clone()),
        created_at: Set(record.created_at),
        deleted_at: Set(record.deleted_at),
    }
}

pub fn call_inquiry_to_active_model(record: &CallInquiryRecord) -> call_inquiry::ActiveModel {
    use sea_orm::ActiveValue::*;

    call_inquiry::ActiveModel {
        id: Set(record.id.clone()),
        date: Set(format_day(record.date)),
        call_type: Set(record.call_type.as_ref().to_string()),
        language: Set(record.language.as_ref().to_string()),
        country_name: Set(record.country_name.clone()),
        iso_code: Set(record.iso_code.clone()),
        dialing_code: Set(record.dialing_code.clone()),
        total_calls: Set(count_column(record.total_calls)),
        quotation_sent: Set(count_column(record.quotation_sent)),
        wins: Set(count_column(record.wins)),
        created_at: Set(record.created_at),
        deleted_at: Set(record.deleted_at),
    }
}
