use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::per;
use crate::storage::models::AdSpendRecord;

/// 单个 campaign 的汇总表现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPerformance {
    pub campaign_id: String,
    /// 取该 campaign 最近一行的名称
    pub campaign_name: String,
    pub spend: f64,
    pub results: u64,
    pub impressions: u64,
    pub reach: u64,
    pub link_clicks: u64,
    pub cost_per_result: f64,
}

struct CampaignAcc<'a> {
    latest: (NaiveDate, &'a str),
    spend: f64,
    results: u64,
    impressions: u64,
    reach: u64,
    link_clicks: u64,
}

/// Group ad rows by `campaign_id`, one output row per distinct id, sorted by id.
pub fn campaign_performance(ads: &[AdSpendRecord]) -> Vec<CampaignPerformance> {
    let mut groups: BTreeMap<&str, CampaignAcc<'_>> = BTreeMap::new();

    for ad in ads {
        let named = (ad.date, ad.campaign_name.as_str());
        let acc = groups
            .entry(ad.campaign_id.as_str())
            .or_insert_with(|| CampaignAcc {
                latest: named,
                spend: 0.0,
                results: 0,
                impressions: 0,
                reach: 0,
                link_clicks: 0,
            });
        if named > acc.latest {
            acc.latest = named;
        }
        acc.spend += ad.amount_spent;
        acc.results = acc.results.saturating_add(ad.results);
        acc.impressions = acc.impressions.saturating_add(ad.impressions);
        acc.reach = acc.reach.saturating_add(ad.reach);
        acc.link_clicks = acc.link_clicks.saturating_add(ad.link_clicks);
    }

    groups
        .into_iter()
        .map(|(id, acc)| CampaignPerformance {
            campaign_id: id.to_string(),
            campaign_name: acc.latest.1.to_string(),
            spend: acc.spend,
            results: acc.results,
            impressions: acc.impressions,
            reach: acc.reach,
            link_clicks: acc.link_clicks,
            cost_per_result: per(acc.spend, acc.results as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::ad;

    #[test]
    fn test_zero_rows() {
        assert!(campaign_performance(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_campaign_id() {
        let ads = vec![
            ad("2024-01-01", "c2", 30.0, 300, 3),
            ad("2024-01-01", "c1", 10.0, 100, 0),
            ad("2024-01-02", "c2", 20.0, 200, 2),
        ];
        let perf = campaign_performance(&ads);
        assert_eq!(perf.len(), 2);

        assert_eq!(perf[0].campaign_id, "c1");
        assert_eq!(perf[0].cost_per_result, 0.0);

        assert_eq!(perf[1].campaign_id, "c2");
        assert_eq!(perf[1].spend, 50.0);
        assert_eq!(perf[1].results, 5);
        assert_eq!(perf[1].impressions, 500);
        assert_eq!(perf[1].reach, 250);
        assert_eq!(perf[1].cost_per_result, 10.0);
    }

    #[test]
    fn test_name_taken_from_latest_row() {
        let mut old = ad("2024-01-01", "c1", 1.0, 1, 1);
        old.campaign_name = "Old".to_string();
        let mut new = ad("2024-02-01", "c1", 1.0, 1, 1);
        new.campaign_name = "Renamed".to_string();

        let perf = campaign_performance(&[new.clone(), old.clone()]);
        assert_eq!(perf[0].campaign_name, "Renamed");
        assert_eq!(perf, campaign_performance(&[old, new]));
    }

    #[test]
    fn test_spend_is_preserved_across_groups() {
        let ads = vec![
            ad("2024-01-01", "a", 12.5, 10, 1),
            ad("2024-01-02", "b", 7.25, 10, 1),
            ad("2024-01-03", "a", 0.25, 10, 0),
            ad("2024-01-03", "c", 100.0, 10, 4),
        ];
        let grouped: f64 = campaign_performance(&ads).iter().map(|c| c.spend).sum();
        let raw: f64 = ads.iter().map(|a| a.amount_spent).sum();
        assert_eq!(grouped, raw);
    }
}
