//! Aggregation and forecast engines
//!
//! Every function here is a pure reducer over rows that were already fetched
//! from a `RecordRepository`. Nothing in this module touches storage, and no
//! reducer fails on empty input: zero rows give zero sums and empty groupings.
//!
//! Division is always guarded. A zero denominator yields the documented
//! default (0, or 0.5 for the channel/language split ratios), never NaN or
//! infinity.

pub mod calls;
pub mod campaigns;
pub mod forecast;
pub mod funnel;
pub mod overview;
pub mod search;

pub use calls::{ByLanguage, ByType, CallAnalytics, CountryStats, call_analytics};
pub use campaigns::{CampaignPerformance, campaign_performance};
pub use forecast::{
    ForecastProjection, ForecastRates, ForecastState, MIN_DAYS_OF_DATA, MIN_WINS, forecast_state,
    project,
};
pub use funnel::{
    FunnelReport, FunnelStage, FunnelStep, FunnelStepView, funnel, overall_conversion, transitions,
};
pub use overview::{DailyStat, OverviewStats, overview_stats};
pub use search::{CampaignMatch, CountryMatch, SearchResults, search};

/// `num / den`，分母为 0 时返回 0
pub(crate) fn per(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

/// 百分比，分母为 0 时返回 0
pub(crate) fn percent(num: f64, den: f64) -> f64 {
    per(num, den) * 100.0
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards() {
        assert_eq!(per(10.0, 0.0), 0.0);
        assert_eq!(per(10.0, 4.0), 2.5);
        assert_eq!(percent(2.0, 5.0), 40.0);
        assert_eq!(percent(2.0, 0.0), 0.0);
    }
}
