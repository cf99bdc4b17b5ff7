//! Assembles the filter, aggregate and insight steps into the reports shown to the user.

use crate::aggregate::{aggregate, totals, Direction, Totals};
use crate::filter::filter;
use crate::insight::{evaluate, top_category, CategoryInsight, Health};
use crate::model::{Category, Snapshot};
use crate::period::{Period, PeriodSelector};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a report breaks down.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Expenses grouped by category.
    #[default]
    Expense,
    /// Income grouped by category.
    Income,
    /// Total income against total expense.
    Comparison,
}

serde_plain::derive_display_from_serialize!(ReportMode);
serde_plain::derive_fromstr_from_deserialize!(ReportMode);

/// One slice of a category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub category: String,
    pub label: String,
    pub color: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Breakdown {
    Categories { slices: Vec<Slice> },
    Comparison { income: f64, expense: f64 },
}

impl Breakdown {
    /// The sum of everything the chart would draw.
    pub fn total(&self) -> f64 {
        match self {
            Breakdown::Categories { slices } => slices.iter().map(|s| s.value).sum(),
            Breakdown::Comparison { income, expense } => income + expense,
        }
    }
}

/// Totals of the transactions in one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub period: Period,
    pub count: usize,
    pub totals: Totals,
}

impl Summary {
    pub fn build(snapshot: &Snapshot, selector: &PeriodSelector, now: NaiveDate) -> Self {
        let subset = filter(snapshot.transactions(), selector, now);
        Self {
            period: selector.resolve(now),
            count: subset.len(),
            totals: totals(subset),
        }
    }
}

/// A category or comparison breakdown for one period plus the health advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub period: Period,
    pub mode: ReportMode,
    pub count: usize,
    pub totals: Totals,
    pub breakdown: Breakdown,
    /// The largest category of the breakdown; absent in comparison mode or with no data.
    pub top_category: Option<CategoryInsight>,
    /// Health derived from every transaction in the snapshot, not just the report period.
    pub health: Health,
}

impl Report {
    pub fn build(
        snapshot: &Snapshot,
        selector: &PeriodSelector,
        mode: ReportMode,
        now: NaiveDate,
    ) -> Self {
        let subset = filter(snapshot.transactions(), selector, now);
        let direction = match mode {
            ReportMode::Income => Direction::Income,
            ReportMode::Expense | ReportMode::Comparison => Direction::Expense,
        };
        let result = aggregate(subset.iter().copied(), direction);

        let (breakdown, top) = match mode {
            ReportMode::Comparison => (
                Breakdown::Comparison {
                    income: result.income,
                    expense: result.expense,
                },
                None,
            ),
            ReportMode::Expense | ReportMode::Income => {
                let slices = result
                    .per_category
                    .iter()
                    .map(|(key, value)| {
                        let info = Category::from_key(key).info();
                        Slice {
                            category: key.clone(),
                            label: info.label.to_string(),
                            color: info.color.to_string(),
                            value: *value,
                        }
                    })
                    .collect();
                (
                    Breakdown::Categories { slices },
                    top_category(&result.per_category),
                )
            }
        };

        let overall = totals(snapshot.transactions());

        Self {
            period: selector.resolve(now),
            mode,
            count: subset.len(),
            totals: result.totals(),
            breakdown,
            top_category: top,
            health: evaluate(overall.income, overall.expense),
        }
    }

    /// True when the breakdown has nothing to draw for this period.
    pub fn is_empty(&self) -> bool {
        self.breakdown.total() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::HealthStatus;
    use crate::model::Transaction;
    use crate::period::YearMonth;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> Snapshot {
        let t = |id: &str, amount: f64, category: &str, d: NaiveDate| {
            Transaction::new(id, "u1", id, amount, d, category)
        };
        Snapshot::new(vec![
            t("1", 1000.0, "salary", date(2024, 1, 1)),
            t("2", -100.0, "food", date(2024, 1, 2)),
            t("3", -50.0, "food", date(2024, 1, 3)),
            t("4", -30.0, "transport", date(2024, 1, 4)),
            t("5", -1100.0, "shopping", date(2024, 2, 10)),
            t("6", 200.0, "crypto", date(2024, 2, 11)),
        ])
    }

    fn january() -> PeriodSelector {
        PeriodSelector::Month(Some(YearMonth::new(2024, 1).unwrap()))
    }

    #[test]
    fn test_expense_report() {
        let report = Report::build(&snapshot(), &january(), ReportMode::Expense, date(2024, 3, 1));
        assert_eq!(report.count, 4);
        let Breakdown::Categories { slices } = &report.breakdown else {
            panic!("expected a category breakdown");
        };
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, "food");
        assert_eq!(slices[0].value, 150.0);
        assert_eq!(slices[1].label, "Transport");
        let top = report.top_category.as_ref().unwrap();
        assert_eq!(top.category, "food");
        assert!((top.percent - 83.333_333).abs() < 1e-3);
        assert_eq!(report.totals.total, 820.0);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_income_report_displays_unknown_as_other() {
        let selector = PeriodSelector::Month(None);
        let report = Report::build(&snapshot(), &selector, ReportMode::Income, date(2024, 2, 20));
        let Breakdown::Categories { slices } = &report.breakdown else {
            panic!("expected a category breakdown");
        };
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, "crypto");
        assert_eq!(slices[0].label, "Other");
    }

    #[test]
    fn test_comparison_report() {
        let report = Report::build(
            &snapshot(),
            &january(),
            ReportMode::Comparison,
            date(2024, 3, 1),
        );
        assert_eq!(
            report.breakdown,
            Breakdown::Comparison {
                income: 1000.0,
                expense: 180.0
            }
        );
        assert!(report.top_category.is_none());
    }

    #[test]
    fn test_health_uses_the_whole_snapshot() {
        // January alone is healthy, but across both months spending exceeds income.
        let report = Report::build(&snapshot(), &january(), ReportMode::Expense, date(2024, 3, 1));
        assert_eq!(report.health.status, HealthStatus::Danger);
        assert_eq!(report.health.income, 1200.0);
        assert_eq!(report.health.expense, 1280.0);
        assert_eq!(report.health.balance, -80.0);
    }

    #[test]
    fn test_empty_period() {
        let selector = PeriodSelector::Week(None);
        let report = Report::build(&snapshot(), &selector, ReportMode::Expense, date(2030, 1, 1));
        assert!(report.is_empty());
        assert_eq!(report.count, 0);
        assert!(report.top_category.is_none());
    }

    #[test]
    fn test_summary() {
        let summary = Summary::build(&snapshot(), &PeriodSelector::All, date(2024, 3, 1));
        assert_eq!(summary.count, 6);
        assert_eq!(summary.totals.income, 1200.0);
        assert_eq!(summary.totals.expense, 1280.0);
        assert_eq!(summary.totals.total, -80.0);
        assert_eq!(summary.period, Period::All);
    }
}
