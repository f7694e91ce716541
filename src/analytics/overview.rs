//! Overview stats (the only range-limited view)

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{per, percent};
use crate::storage::models::{AdSpendRecord, CallInquiryRecord, CallType};

/// 单日汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub spend: f64,
    pub calls: u64,
    pub wins: u64,
    pub cpa: f64,
}

/// 概览统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_spend: f64,
    pub total_calls: u64,
    pub local_calls: u64,
    pub whatsapp_calls: u64,
    pub total_wins: u64,
    pub cost_per_client: f64,
    /// 百分比（0-100）
    pub conversion_rate: f64,
    /// 按日期升序
    pub daily_stats: Vec<DailyStat>,
}

#[derive(Default)]
struct DayAcc {
    spend: f64,
    calls: u64,
    wins: u64,
}

/// Reduce range-filtered rows to the overview.
///
/// `daily_stats` has one entry per date present in either row set. Calls with
/// an unrecognized channel count toward `total_calls` but neither
/// `local_calls` nor `whatsapp_calls`.
pub fn overview_stats(ads: &[AdSpendRecord], calls: &[CallInquiryRecord]) -> OverviewStats {
    let mut stats = OverviewStats::default();
    let mut days: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();

    for ad in ads {
        stats.total_spend += ad.amount_spent;
        days.entry(ad.date).or_default().spend += ad.amount_spent;
    }

    for call in calls {
        stats.total_calls = stats.total_calls.saturating_add(call.total_calls);
        stats.total_wins = stats.total_wins.saturating_add(call.wins);
        match call.call_type {
            CallType::Local => stats.local_calls = stats.local_calls.saturating_add(call.total_calls),
            CallType::Whatsapp => {
                stats.whatsapp_calls = stats.whatsapp_calls.saturating_add(call.total_calls)
            }
            CallType::Unrecognized => {}
        }

        let day = days.entry(call.date).or_default();
        day.calls = day.calls.saturating_add(call.total_calls);
        day.wins = day.wins.saturating_add(call.wins);
    }

    stats.cost_per_client = per(stats.total_spend, stats.total_wins as f64);
    stats.conversion_rate = percent(stats.total_wins as f64, stats.total_calls as f64);
    stats.daily_stats = days
        .into_iter()
        .map(|(date, acc)| DailyStat {
            date,
            spend: acc.spend,
            calls: acc.calls,
            wins: acc.wins,
            cpa: per(acc.spend, acc.wins as f64),
        })
        .collect();

    stats
}
