use crate::commands::{load_snapshot, selector, Out};
use crate::model::{Amount, Snapshot};
use crate::period::PeriodSelector;
use crate::report::Summary;
use crate::{Config, Result};
use chrono::NaiveDate;

/// Shows the balance, income and expense of the selected period.
pub async fn summary(
    config: &Config,
    period: Option<PeriodSelector>,
    now: NaiveDate,
) -> Result<Out<Summary>> {
    let snapshot = load_snapshot(config).await?;
    Ok(summarize(&snapshot, &selector(config, period), now))
}

/// Builds the summary output for one snapshot. `watch` calls this on every delivery.
pub(crate) fn summarize(
    snapshot: &Snapshot,
    selector: &PeriodSelector,
    now: NaiveDate,
) -> Out<Summary> {
    let summary = Summary::build(snapshot, selector, now);
    let message = format!(
        "Summary for {} ({} transactions)\n  Balance: {}\n  Income:  {}\n  Expense: {}",
        summary.period,
        summary.count,
        Amount::from_f64(summary.totals.total),
        Amount::from_f64(summary.totals.income),
        Amount::from_f64(summary.totals.expense),
    );
    Out::new(message, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;
    use crate::test::{date, TestEnv};

    #[tokio::test]
    async fn test_summary_current_month() {
        let env = TestEnv::new().await;
        env.write_sample().await;
        let out = summary(env.config(), Some(PeriodSelector::Month(None)), date(2024, 2, 15))
            .await
            .unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.totals.income, 1500.0);
        assert_eq!(s.totals.expense, 2580.0);
        assert!(out.message().contains("Summary for 2024-02 (3 transactions)"));
        assert!(out.message().contains("Balance: -฿1,080.00"));
    }

    #[tokio::test]
    async fn test_summary_uses_configured_default() {
        let env = TestEnv::new().await;
        env.write_sample().await;
        let out = summary(env.config(), None, date(2024, 2, 15)).await.unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 6);
        assert_eq!(s.totals.total, 28754.25);
    }

    #[tokio::test]
    async fn test_summary_skips_bad_records_and_other_owners() {
        let env = TestEnv::new().await;
        env.write_raw(&serde_json::json!({
            "a": {"uid": crate::test::OWNER, "amount": "-1,000", "date": "2024-01-05"},
            "b": {"uid": crate::test::OWNER, "amount": "lots", "date": "2024-01-05"},
            "c": {"uid": crate::test::OWNER, "amount": -5},
            "d": {"uid": "someone-else", "amount": 99, "date": "2024-01-05"},
        }))
        .await;
        let selector = PeriodSelector::Month(Some(YearMonth::new(2024, 1).unwrap()));
        let out = summary(env.config(), Some(selector), date(2024, 3, 1)).await.unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.totals.expense, 1000.0);
    }

    #[tokio::test]
    async fn test_summary_bad_snapshot_is_tagged() {
        let env = TestEnv::new().await;
        crate::utils::write(env.config().snapshot_path(), "not json")
            .await
            .unwrap();
        let err = summary(env.config(), None, date(2024, 3, 1)).await.unwrap_err();
        assert!(format!("{err:#}").starts_with("Snapshot error"));
    }
}
