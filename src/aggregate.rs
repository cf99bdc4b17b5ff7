//! Reduces a set of transactions to totals, per-category sums, and period buckets.
//!
//! Every function here recomputes from scratch over the transactions it is given and sums in
//! `f64` without intermediate rounding. Rounding happens only when an `Amount` is displayed.

use crate::model::Transaction;
use crate::period::{Granularity, PeriodKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of the ledger a per-category grouping covers. The two are never mixed.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

impl Direction {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Direction::Income => transaction.is_income(),
            Direction::Expense => transaction.is_expense(),
        }
    }
}

/// Net, income and expense sums. `expense` is a non-negative magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total: f64,
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    fn add(&mut self, amount: f64) {
        self.total += amount;
        if amount > 0.0 {
            self.income += amount;
        } else if amount < 0.0 {
            self.expense -= amount;
        }
    }
}

/// The result of aggregating one subset of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: f64,
    pub income: f64,
    pub expense: f64,
    /// Absolute sums keyed by the stored category string, for one `Direction` only.
    pub per_category: BTreeMap<String, f64>,
}

impl AggregateResult {
    pub fn totals(&self) -> Totals {
        Totals {
            total: self.total,
            income: self.income,
            expense: self.expense,
        }
    }
}

/// Computes net, income and expense totals along with per-category sums for `direction`.
pub fn aggregate<'a, I>(transactions: I, direction: Direction) -> AggregateResult
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    let mut per_category = BTreeMap::new();
    for t in transactions {
        totals.add(t.amount());
        if direction.matches(t) {
            *per_category.entry(t.category().to_string()).or_insert(0.0) += t.amount().abs();
        }
    }
    AggregateResult {
        total: totals.total,
        income: totals.income,
        expense: totals.expense,
        per_category,
    }
}

/// Computes net, income and expense totals.
pub fn totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for t in transactions {
        totals.add(t.amount());
    }
    totals
}

/// Sums the absolute amounts of the transactions in `direction`, grouped by stored category.
pub fn by_category<'a, I>(transactions: I, direction: Direction) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    aggregate(transactions, direction).per_category
}

/// Groups transactions into calendar buckets of the given size.
pub fn buckets<'a, I>(transactions: I, granularity: Granularity) -> BTreeMap<PeriodKey, Totals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<PeriodKey, Totals> = BTreeMap::new();
    for t in transactions {
        buckets
            .entry(PeriodKey::of(t.date(), granularity))
            .or_default()
            .add(t.amount());
    }
    buckets
}

/// One bucket of a running balance series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalancePoint {
    pub period: PeriodKey,
    pub totals: Totals,
    /// The cumulative net of this bucket and every earlier one.
    pub balance: f64,
}

/// Accumulates bucket nets in chronological order.
pub fn running_balance(buckets: &BTreeMap<PeriodKey, Totals>) -> Vec<BalancePoint> {
    let mut balance = 0.0;
    buckets
        .iter()
        .map(|(period, totals)| {
            balance += totals.total;
            BalancePoint {
                period: *period,
                totals: *totals,
                balance,
            }
        })
        .collect()
}
