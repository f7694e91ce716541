//! Report mode
//!
//! 一次性计算看板数据并以 JSON 打印到标准输出，不启动 HTTP 服务。

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::runtime::lifetime;
use crate::storage::DateRange;
use crate::storage::models::parse_day;

fn parse_optional_day(value: Option<&str>, name: &str) -> Result<Option<chrono::NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => parse_day(s)
            .map(Some)
            .with_context(|| format!("Invalid --{} '{}', expected YYYY-MM-DD", name, s)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// `funnelboard overview [--from] [--to]`
pub async fn run_overview_report(from: Option<&str>, to: Option<&str>) -> Result<()> {
    let range = DateRange::new(
        parse_optional_day(from, "from")?,
        parse_optional_day(to, "to")?,
    );
    let context = lifetime::startup::prepare_startup().await?;
    debug!("Computing overview report for {:?}", range);

    let stats = context
        .dashboard
        .overview(range)
        .await
        .context("Failed to compute overview")?;
    print_json(&stats)
}

/// `funnelboard forecast [--target N]`
///
/// 没有 `--target` 时只输出预测状态；有则同时输出投放预算推算。
pub async fn run_forecast_report(target: Option<u64>) -> Result<()> {
    let context = lifetime::startup::prepare_startup().await?;
    let state = context
        .dashboard
        .forecast()
        .await
        .context("Failed to compute forecast")?;

    match target {
        None => print_json(&state),
        Some(target) => {
            let projection = context
                .dashboard
                .projection(target)
                .await
                .context("Failed to compute projection")?;
            print_json(&serde_json::json!({
                "forecast": state,
                "projection": projection,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_day() {
        assert_eq!(parse_optional_day(None, "from").unwrap(), None);
        assert!(parse_optional_day(Some("2024-02-01"), "from").unwrap().is_some());
        assert!(parse_optional_day(Some("02/01/2024"), "from").is_err());
    }
}
