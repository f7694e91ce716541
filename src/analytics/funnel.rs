use serde::{Deserialize, Serialize};
use strum::Display;

use crate::storage::models::{AdSpendRecord, CallInquiryRecord};

/// 漏斗阶段，顺序固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FunnelStage {
    Impressions,
    Results,
    Inquiries,
    Clients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub name: FunnelStage,
    pub value: u64,
}

/// 展示用：阶段值加上到下一阶段的转化率与流失率（百分比）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunnelStepView {
    pub name: FunnelStage,
    pub value: u64,
    pub conversion: f64,
    pub drop_off: f64,
}

/// 漏斗视图：原始阶段值、逐阶段转化与整体转化率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelReport {
    pub steps: [FunnelStep; 4],
    pub stages: Vec<FunnelStepView>,
    pub overall_conversion: f64,
}

impl FunnelReport {
    pub fn from_steps(steps: [FunnelStep; 4]) -> Self {
        Self {
            stages: transitions(&steps),
            overall_conversion: overall_conversion(&steps),
            steps,
        }
    }
}

/// Four stage totals in fixed order. Each stage is expected, not required,
/// to be no larger than the one before it.
pub fn funnel(ads: &[AdSpendRecord], calls: &[CallInquiryRecord]) -> [FunnelStep; 4] {
    let sum_ads = |f: fn(&AdSpendRecord) -> u64| ads.iter().map(f).fold(0u64, u64::saturating_add);
    let sum_calls =
        |f: fn(&CallInquiryRecord) -> u64| calls.iter().map(f).fold(0u64, u64::saturating_add);

    [
        FunnelStep {
            name: FunnelStage::Impressions,
            value: sum_ads(|a| a.impressions),
        },
        FunnelStep {
            name: FunnelStage::Results,
            value: sum_ads(|a| a.results),
        },
        FunnelStep {
            name: FunnelStage::Inquiries,
            value: sum_calls(|c| c.total_calls),
        },
        FunnelStep {
            name: FunnelStage::Clients,
            value: sum_calls(|c| c.wins),
        },
    ]
}

/// Per-stage conversion and drop-off toward the next stage. A zero stage is
/// treated as 1 in the denominator; the last stage has nothing after it and
/// reports 0 for both.
pub fn transitions(steps: &[FunnelStep]) -> Vec<FunnelStepView> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (conversion, drop_off) = match steps.get(i + 1) {
                Some(next) => {
                    let cur = step.value.max(1) as f64;
                    let next_value = next.value as f64;
                    (
                        next_value / cur * 100.0,
                        (step.value as f64 - next_value) / cur * 100.0,
                    )
                }
                None => (0.0, 0.0),
            };
            FunnelStepView {
                name: step.name,
                value: step.value,
                conversion,
                drop_off,
            }
        })
        .collect()
}

/// Clients as a percentage of impressions; 0 when there are no clients.
pub fn overall_conversion(steps: &[FunnelStep]) -> f64 {
    match (steps.first(), steps.last()) {
        (Some(first), Some(last)) if last.value > 0 => {
            last.value as f64 / first.value.max(1) as f64 * 100.0
        }
        _ => 0.0,
    }
}
