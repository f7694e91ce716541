//! Forecast engine
//!
//! The forecast is locked until the history is long enough and has enough
//! wins to trust a linear rate model. The state is never stored: it is
//! recomputed from the full undeleted history on every call.

use serde::{Deserialize, Serialize};

use super::per;
use crate::errors::{DashboardError, Result};
use crate::storage::models::{AdSpendRecord, CallInquiryRecord, CallType, Language};

/// 解锁所需的最少天数（首末投放日期之差）
pub const MIN_DAYS_OF_DATA: i64 = 14;
/// 解锁所需的最少成交数
pub const MIN_WINS: u64 = 30;

/// 无通话数据时的渠道 / 语言拆分比例
const EVEN_SPLIT: f64 = 0.5;

/// 历史平均转化率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRates {
    pub avg_cpa: f64,
    pub calls_per_win: f64,
    pub local_ratio: f64,
    pub eng_ratio: f64,
}

impl ForecastRates {
    pub fn from_rows(ads: &[AdSpendRecord], calls: &[CallInquiryRecord]) -> Self {
        let total_spend: f64 = ads.iter().map(|a| a.amount_spent).sum();

        let mut total_calls = 0u64;
        let mut wins = 0u64;
        let mut local = 0u64;
        let mut english = 0u64;
        for call in calls {
            total_calls = total_calls.saturating_add(call.total_calls);
            wins = wins.saturating_add(call.wins);
            if call.call_type == CallType::Local {
                local = local.saturating_add(call.total_calls);
            }
            if call.language == Language::English {
                english = english.saturating_add(call.total_calls);
            }
        }

        let split = |part: u64| {
            if total_calls > 0 {
                part as f64 / total_calls as f64
            } else {
                EVEN_SPLIT
            }
        };

        Self {
            avg_cpa: per(total_spend, wins as f64),
            calls_per_win: per(total_calls as f64, wins as f64),
            local_ratio: split(local),
            eng_ratio: split(english),
        }
    }
}

/// 预测状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastState {
    Locked {
        days_of_data: i64,
        wins: u64,
    },
    Unlocked {
        days_of_data: i64,
        wins: u64,
        rates: ForecastRates,
    },
}

impl ForecastState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ForecastState::Unlocked { .. })
    }

    pub fn days_of_data(&self) -> i64 {
        match self {
            ForecastState::Locked { days_of_data, .. }
            | ForecastState::Unlocked { days_of_data, .. } => *days_of_data,
        }
    }

    pub fn wins(&self) -> u64 {
        match self {
            ForecastState::Locked { wins, .. } | ForecastState::Unlocked { wins, .. } => *wins,
        }
    }

    pub fn rates(&self) -> Option<&ForecastRates> {
        match self {
            ForecastState::Unlocked { rates, .. } => Some(rates),
            ForecastState::Locked { .. } => None,
        }
    }
}

/// Linear projection for a target number of clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastProjection {
    pub target_clients: u64,
    pub required_spend: f64,
    pub expected_calls: f64,
    pub local_calls: f64,
    pub whatsapp_calls: f64,
    pub english_calls: f64,
    pub sinhala_calls: f64,
}

/// 首末投放日期相差的天数，没有投放数据时为 0
fn days_of_data(ads: &[AdSpendRecord]) -> i64 {
    let mut dates = ads.iter().map(|a| a.date);
    let Some(first) = dates.next() else {
        return 0;
    };
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    (max - min).num_days()
}

/// Compute the forecast state from the full undeleted history.
///
/// The day span comes from ad-spend dates only.
pub fn forecast_state(ads: &[AdSpendRecord], calls: &[CallInquiryRecord]) -> ForecastState {
    let days_of_data = days_of_data(ads);
    let wins = calls.iter().map(|c| c.wins).fold(0u64, u64::saturating_add);

    if days_of_data >= MIN_DAYS_OF_DATA && wins >= MIN_WINS {
        ForecastState::Unlocked {
            days_of_data,
            wins,
            rates: ForecastRates::from_rows(ads, calls),
        }
    } else {
        ForecastState::Locked { days_of_data, wins }
    }
}

/// Project spend and call volume for `target_clients`.
///
/// Only valid for an unlocked state and a target of at least one client.
pub fn project(state: &ForecastState, target_clients: u64) -> Result<ForecastProjection> {
    if target_clients == 0 {
        return Err(DashboardError::validation(
            "target_clients must be a positive integer",
        ));
    }
    let rates = state.rates().ok_or_else(|| {
        DashboardError::validation(format!(
            "forecast is locked: need at least {} days of data and {} wins (have {} days, {} wins)",
            MIN_DAYS_OF_DATA,
            MIN_WINS,
            state.days_of_data(),
            state.wins()
        ))
    })?;
    Ok(project_with_rates(rates, target_clients))
}

fn project_with_rates(rates: &ForecastRates, target_clients: u64) -> ForecastProjection {
    let target = target_clients as f64;
    let expected_calls = target * rates.calls_per_win;
    ForecastProjection {
        target_clients,
        required_spend: target * rates.avg_cpa,
        expected_calls,
        local_calls: expected_calls * rates.local_ratio,
        whatsapp_calls: expected_calls * (1.0 - rates.local_ratio),
        english_calls: expected_calls * rates.eng_ratio,
        sinhala_calls: expected_calls * (1.0 - rates.eng_ratio),
    }
}
