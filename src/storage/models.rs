//! Domain records shared by the repository, engines and services.
//!
//! Dates are calendar days. On the wire and in storage they are fixed-width
//! `YYYY-MM-DD` strings, so lexical order equals chronological order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// 日期格式（固定宽度）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 严格解析 `YYYY-MM-DD`，拒绝 `2024-1-5` 这类非固定宽度写法
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// 格式化为 `YYYY-MM-DD`
pub fn format_day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 咨询渠道
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CallType {
    Local,
    Whatsapp,
    /// Stored value outside the known set; kept out of per-channel sums.
    #[serde(other)]
    Unrecognized,
}

/// 来电语言
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    English,
    Sinhala,
    #[serde(other)]
    Unrecognized,
}

impl CallType {
    /// Parse a stored value, mapping anything unknown to `Unrecognized`.
    pub fn from_stored(s: &str) -> Self {
        match s.parse::<CallType>() {
            Ok(CallType::Unrecognized) | Err(_) => CallType::Unrecognized,
            Ok(t) => t,
        }
    }
}

impl Language {
    pub fn from_stored(s: &str) -> Self {
        match s.parse::<Language>() {
            Ok(Language::Unrecognized) | Err(_) => Language::Unrecognized,
            Ok(l) => l,
        }
    }
}

/// 记录集合类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    AdSpend,
    CallInquiry,
}

/// One day's recorded performance for one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSpendRecord {
    pub id: String,
    pub date: NaiveDate,
    pub campaign_id: String,
    pub campaign_name: String,
    pub amount_spent: f64,
    pub impressions: u64,
    pub reach: u64,
    pub link_clicks: u64,
    pub results: u64,
    #[serde(default)]
    pub glitch_noted: bool,
    #[serde(default)]
    pub glitch_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One day's batched count of inquiries from one channel/country/language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInquiryRecord {
    pub id: String,
    pub date: NaiveDate,
    pub call_type: CallType,
    pub language: Language,
    pub country_name: String,
    pub iso_code: String,
    pub dialing_code: String,
    pub total_calls: u64,
    pub quotation_sent: u64,
    pub wins: u64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AdSpendRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl CallInquiryRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// 闭区间日期过滤；缺失的一端视为无界
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// 仓储查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub range: DateRange,
    /// 为 true 时同时返回已软删除的行（仅管理列表使用）
    pub include_deleted: bool,
}

impl RecordQuery {
    /// All undeleted rows, no date bounds.
    pub fn active() -> Self {
        Self::default()
    }

    pub fn in_range(range: DateRange) -> Self {
        Self {
            range,
            include_deleted: false,
        }
    }

    pub fn with_deleted() -> Self {
        Self {
            range: DateRange::unbounded(),
            include_deleted: true,
        }
    }

    pub fn matches(&self, date: NaiveDate, deleted_at: Option<DateTime<Utc>>) -> bool {
        (self.include_deleted || deleted_at.is_none()) && self.range.contains(date)
    }
}

/// 下拉框使用的 campaign 引用
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignRef {
    pub id: String,
    pub name: String,
}
