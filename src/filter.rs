//! Selects the transactions that fall inside a requested time window.

use crate::model::Transaction;
use crate::period::PeriodSelector;
use chrono::NaiveDate;
use std::cmp::Reverse;

/// Returns the transactions matching `selector`, in input order.
///
/// A month or week selector without an explicit value is resolved against `now`. The input is
/// never modified.
pub fn filter<'a, I>(
    transactions: I,
    selector: &PeriodSelector,
    now: NaiveDate,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let period = selector.resolve(now);
    transactions
        .into_iter()
        .filter(|t| period.contains(t.date()))
        .collect()
}

/// Sorts transactions for display, newest first. Transactions on the same date keep their
/// relative order.
pub fn sort_newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by_key(|t| Reverse(t.date()));
}
