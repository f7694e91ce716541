//! Call analytics: breakdowns by country, language and channel.
//!
//! Rows whose language or channel was not recognized when read back from
//! storage are left out of `by_language` / `by_type`. They still count in
//! `by_country`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::models::{CallInquiryRecord, CallType, Language};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryStats {
    pub country_name: String,
    pub iso_code: String,
    pub calls: u64,
    pub quotes: u64,
    pub wins: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByLanguage {
    pub english: u64,
    pub sinhala: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByType {
    pub local: u64,
    pub whatsapp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAnalytics {
    /// 按通话量降序，同量按国家名
    pub by_country: Vec<CountryStats>,
    pub by_language: ByLanguage,
    pub by_type: ByType,
}

pub fn call_analytics(calls: &[CallInquiryRecord]) -> CallAnalytics {
    let mut countries: BTreeMap<&str, CountryStats> = BTreeMap::new();
    let mut by_language = ByLanguage::default();
    let mut by_type = ByType::default();

    for call in calls {
        let entry = countries
            .entry(call.country_name.as_str())
            .or_insert_with(|| CountryStats {
                country_name: call.country_name.clone(),
                iso_code: call.iso_code.clone(),
                calls: 0,
                quotes: 0,
                wins: 0,
            });
        // 同一国家出现多个 iso 时取字典序最小者，结果与输入顺序无关
        if call.iso_code < entry.iso_code {
            entry.iso_code = call.iso_code.clone();
        }
        entry.calls = entry.calls.saturating_add(call.total_calls);
        entry.quotes = entry.quotes.saturating_add(call.quotation_sent);
        entry.wins = entry.wins.saturating_add(call.wins);

        match call.language {
            Language::English => by_language.english = by_language.english.saturating_add(call.total_calls),
            Language::Sinhala => by_language.sinhala = by_language.sinhala.saturating_add(call.total_calls),
            Language::Unrecognized => {}
        }
        match call.call_type {
            CallType::Local => by_type.local = by_type.local.saturating_add(call.total_calls),
            CallType::Whatsapp => by_type.whatsapp = by_type.whatsapp.saturating_add(call.total_calls),
            CallType::Unrecognized => {}
        }
    }

    let mut by_country: Vec<CountryStats> = countries.into_values().collect();
    by_country.sort_by(|a, b| {
        b.calls
            .cmp(&a.calls)
            .then_with(|| a.country_name.cmp(&b.country_name))
    });

    CallAnalytics {
        by_country,
        by_language,
        by_type,
    }
}
