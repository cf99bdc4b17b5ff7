use crate::args::ReportArgs;
use crate::commands::{load_snapshot, selector, Out};
use crate::model::Amount;
use crate::report::{Breakdown, Report, ReportMode};
use crate::{Config, Result};
use chrono::NaiveDate;
use std::fmt::Write;

/// Breaks the selected period down by category (or income against expense) and appends the
/// financial-health advice.
pub async fn report(config: &Config, args: &ReportArgs, now: NaiveDate) -> Result<Out<Report>> {
    let snapshot = load_snapshot(config).await?;
    let report = Report::build(&snapshot, &selector(config, args.period()), args.mode(), now);
    Ok(Out::new(render(&report), report))
}

fn render(report: &Report) -> String {
    let mut s = String::new();
    let heading = match report.mode {
        ReportMode::Expense => "Expenses by category",
        ReportMode::Income => "Income by category",
        ReportMode::Comparison => "Income vs expense",
    };
    let _ = writeln!(s, "{heading} for {}", report.period);

    if report.is_empty() {
        let _ = writeln!(s, "  No data for this period");
    } else {
        let total = report.breakdown.total();
        match &report.breakdown {
            Breakdown::Categories { slices } => {
                for slice in slices {
                    let _ = writeln!(
                        s,
                        "  {:<14} {:>14} {:>5.1}%",
                        slice.label,
                        Amount::from_f64(slice.value).to_string(),
                        slice.value / total * 100.0
                    );
                }
            }
            Breakdown::Comparison { income, expense } => {
                for (label, value) in [("Income", income), ("Expense", expense)] {
                    let amount = Amount::from_f64(*value).to_string();
                    let _ = writeln!(s, "  {label:<14} {amount:>14}");
                }
            }
        }
    }

    if let Some(top) = &report.top_category {
        let _ = writeln!(
            s,
            "\nTop category: {} ({}, {:.1}% of the total)",
            top.label,
            Amount::from_f64(top.value),
            top.percent
        );
    }

    let health = &report.health;
    let _ = write!(
        s,
        "\n{} {}\n{}\nOverall balance {} (savings rate {:.1}%)",
        health.status.icon(),
        health.title,
        health.message,
        Amount::from_f64(health.balance),
        health.savings_rate
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::HealthStatus;
    use crate::period::{PeriodSelector, YearMonth};
    use crate::test::{date, TestEnv};

    fn february() -> Option<PeriodSelector> {
        Some(PeriodSelector::Month(Some(YearMonth::new(2024, 2).unwrap())))
    }

    #[tokio::test]
    async fn test_report_expense() {
        let env = TestEnv::new().await;
        env.write_sample().await;
        let args = ReportArgs::new(february(), ReportMode::Expense);
        let out = report(env.config(), &args, date(2024, 3, 1)).await.unwrap();
        let r = out.structure().unwrap();
        assert_eq!(r.top_category.as_ref().unwrap().category, "utilities");
        // All-time income 31500 against expense 2745.75 is a healthy savings rate.
        assert_eq!(r.health.status, HealthStatus::Good);

        let message = out.message();
        assert!(message.starts_with("Expenses by category for 2024-02"));
        assert!(message.contains("Utilities"));
        assert!(message.contains("฿2,500.00"));
        assert!(message.contains("Top category: Utilities"));
        assert!(message.contains("Great! Your finances are healthy"));
    }

    #[tokio::test]
    async fn test_report_comparison() {
        let env = TestEnv::new().await;
        env.write_sample().await;
        let args = ReportArgs::new(february(), ReportMode::Comparison);
        let out = report(env.config(), &args, date(2024, 3, 1)).await.unwrap();
        assert!(out.structure().unwrap().top_category.is_none());
        assert!(out.message().contains("Income vs expense for 2024-02"));
        assert!(!out.message().contains("Top category"));
    }

    #[tokio::test]
    async fn test_report_empty_period() {
        let env = TestEnv::new().await;
        let args = ReportArgs::new(Some(PeriodSelector::Month(None)), ReportMode::Income);
        let out = report(env.config(), &args, date(2024, 3, 1)).await.unwrap();
        assert!(out.message().contains("No data for this period"));
        assert_eq!(out.structure().unwrap().health.status, HealthStatus::Warning);
    }
}
