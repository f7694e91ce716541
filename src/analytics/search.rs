use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::storage::models::{AdSpendRecord, CallInquiryRecord};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignMatch {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountryMatch {
    pub name: String,
    pub iso: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub campaigns: Vec<CampaignMatch>,
    pub countries: Vec<CountryMatch>,
}

/// Case-insensitive substring lookup over campaigns (name, id) and countries
/// (name, iso, dialing code).
///
/// Matches are deduplicated on the whole `{name, id}` / `{name, iso}` pair and
/// returned sorted. A blank query matches nothing.
pub fn search(query: &str, ads: &[AdSpendRecord], calls: &[CallInquiryRecord]) -> SearchResults {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    let campaigns: BTreeSet<CampaignMatch> = ads
        .iter()
        .filter(|a| hit(&a.campaign_name) || hit(&a.campaign_id))
        .map(|a| CampaignMatch {
            name: a.campaign_name.clone(),
            id: a.campaign_id.clone(),
        })
        .collect();

    let countries: BTreeSet<CountryMatch> = calls
        .iter()
        .filter(|c| hit(&c.country_name) || hit(&c.iso_code) || hit(&c.dialing_code))
        .map(|c| CountryMatch {
            name: c.country_name.clone(),
            iso: c.iso_code.clone(),
        })
        .collect();

    SearchResults {
        campaigns: campaigns.into_iter().collect(),
        countries: countries.into_iter().collect(),
    }
}
