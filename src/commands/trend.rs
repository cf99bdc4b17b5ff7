use crate::aggregate::{buckets, running_balance, BalancePoint};
use crate::args::TrendArgs;
use crate::commands::{load_snapshot, selector, Out};
use crate::filter::filter;
use crate::model::{Amount, Snapshot};
use crate::period::{Granularity, Period, PeriodSelector};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// Totals per calendar bucket with the balance carried forward from bucket to bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub period: Period,
    pub granularity: Granularity,
    pub points: Vec<BalancePoint>,
}

impl Trend {
    pub fn build(
        snapshot: &Snapshot,
        selector: &PeriodSelector,
        granularity: Granularity,
        now: NaiveDate,
    ) -> Self {
        let subset = filter(snapshot.transactions(), selector, now);
        Self {
            period: selector.resolve(now),
            granularity,
            points: running_balance(&buckets(subset, granularity)),
        }
    }
}

/// Shows income, expense and the running balance per day, week or month.
pub async fn trend(config: &Config, args: &TrendArgs, now: NaiveDate) -> Result<Out<Trend>> {
    let snapshot = load_snapshot(config).await?;
    let trend = Trend::build(&snapshot, &selector(config, args.period()), args.by(), now);

    let mut message = format!("Trend by {} for {}", trend.granularity, trend.period);
    if trend.points.is_empty() {
        message.push_str("\n  No data for this period");
    }
    for p in &trend.points {
        let _ = write!(
            message,
            "\n  {:<10} income {:>14}  expense {:>14}  net {:>14}  balance {:>14}",
            p.period.to_string(),
            Amount::from_f64(p.totals.income).to_string(),
            Amount::from_f64(p.totals.expense).to_string(),
            Amount::from_f64(p.totals.total).to_string(),
            Amount::from_f64(p.balance).to_string(),
        );
    }
    Ok(Out::new(message, trend))
}
