//! Financial-health classification and category insights derived from aggregate figures.

use crate::model::{label_for, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Savings rate, in percent of income, below which finances are flagged as tight.
pub const SAVINGS_TARGET_PERCENT: f64 = 20.0;

/// A three-tier summary of cash flow.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Good,
    Warning,
    Danger,
}

serde_plain::derive_display_from_serialize!(HealthStatus);
serde_plain::derive_fromstr_from_deserialize!(HealthStatus);

impl HealthStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Good => "✨",
            HealthStatus::Warning => "⚠️",
            HealthStatus::Danger => "🚨",
        }
    }
}

/// The health classification together with the figures it was derived from and the advice
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: HealthStatus,
    pub title: String,
    pub message: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    /// Percent of income kept as balance; 0 when there is no income.
    pub savings_rate: f64,
}

/// Returns `(income - expense) / income * 100`, or 0 when `income` is not positive.
pub fn savings_rate(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        (income - expense) / income * 100.0
    } else {
        0.0
    }
}

/// Classifies cash flow. The first matching rule wins:
/// 1. a negative balance is `Danger`
/// 2. a savings rate under 20% is `Warning`
/// 3. anything else is `Good`
///
/// With no income the savings rate is 0, so `evaluate(0.0, 0.0)` is a `Warning`.
pub fn evaluate(income: f64, expense: f64) -> Health {
    let balance = income - expense;
    let savings_rate = savings_rate(income, expense);

    let (status, title, message) = if balance < 0.0 {
        (
            HealthStatus::Danger,
            "Careful! Spending exceeds income".to_string(),
            format!(
                "You are {} in the red. Cut back on non-essential spending or find extra \
                income soon.",
                Amount::from_f64(balance.abs())
            ),
        )
    } else if savings_rate < SAVINGS_TARGET_PERCENT {
        (
            HealthStatus::Warning,
            "Money is getting tight".to_string(),
            format!(
                "You are keeping only {savings_rate:.1}% of your income (aim for at least \
                {SAVINGS_TARGET_PERCENT:.0}%). Could you trim coffee or shopping a little?"
            ),
        )
    } else {
        (
            HealthStatus::Good,
            "Great! Your finances are healthy".to_string(),
            "You are managing income and expenses well and still have savings left. Keep it up."
                .to_string(),
        )
    };

    Health {
        status,
        title,
        message,
        income,
        expense,
        balance,
        savings_rate,
    }
}

/// The category that takes the largest share of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInsight {
    /// The stored category key.
    pub category: String,
    pub label: String,
    pub value: f64,
    /// Share of the breakdown total in percent; 0 when the total is 0.
    pub percent: f64,
}

/// Finds the category with the largest sum. Ties go to the category key that sorts first.
/// Returns `None` for an empty breakdown.
pub fn top_category(per_category: &BTreeMap<String, f64>) -> Option<CategoryInsight> {
    let mut best: Option<(&String, f64)> = None;
    let mut total = 0.0;
    for (category, value) in per_category {
        total += *value;
        if best.map_or(true, |(_, max)| *value > max) {
            best = Some((category, *value));
        }
    }
    let (category, value) = best?;
    let percent = if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    };
    Some(CategoryInsight {
        category: category.clone(),
        label: label_for(category).to_string(),
        value,
        percent,
    })
}
