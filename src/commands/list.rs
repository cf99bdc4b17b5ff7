//! The `list` command: the transactions of one period, newest first.

use crate::aggregate::{totals, Totals};
use crate::args::{ListArgs, OutputFormat};
use crate::commands::{load_snapshot, selector, Out};
use crate::error::{ErrorType, IntoResult};
use crate::filter::{filter, sort_newest_first};
use crate::model::{Amount, AmountFormat, Snapshot, Transaction};
use crate::period::{Period, PeriodSelector};
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// One transaction as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// The stored category key.
    pub category: String,
    pub label: String,
    pub icon: String,
    pub amount: Amount,
}

impl From<&Transaction> for ListRow {
    fn from(t: &Transaction) -> Self {
        let info = t.category_kind().info();
        Self {
            id: t.id().to_string(),
            date: t.date(),
            description: t.description().to_string(),
            category: t.category().to_string(),
            label: info.label.to_string(),
            icon: info.icon.to_string(),
            amount: Amount::from_f64(t.amount()),
        }
    }
}

/// Rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of objects, one per transaction.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

impl Rows {
    pub fn render(rows: &[ListRow], format: OutputFormat) -> Result<Self> {
        match format {
            OutputFormat::Json => Ok(Rows::Json(
                serde_json::to_value(rows).context("Unable to serialize rows")?,
            )),
            OutputFormat::Table => Ok(Rows::Table(markdown_table(rows))),
            OutputFormat::Csv => csv_rows(rows).map(Rows::Csv),
        }
    }
}

/// The structured result of `list`.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub period: Period,
    pub count: usize,
    pub totals: Totals,
    pub rows: Vec<ListRow>,
}

impl Listing {
    pub fn build(
        snapshot: &Snapshot,
        selector: &PeriodSelector,
        args: &ListArgs,
        now: NaiveDate,
    ) -> Self {
        let mut subset = filter(snapshot.transactions(), selector, now);
        if let Some(direction) = args.direction() {
            subset.retain(|t| direction.matches(t));
        }
        sort_newest_first(&mut subset);
        Self {
            period: selector.resolve(now),
            count: subset.len(),
            totals: totals(subset.iter().copied()),
            rows: subset.into_iter().map(ListRow::from).collect(),
        }
    }
}

/// Lists the transactions of the selected period, newest first.
pub async fn list(config: &Config, args: &ListArgs, now: NaiveDate) -> Result<Out<Listing>> {
    let snapshot = load_snapshot(config).await?;
    let selector = selector(config, args.period());
    let listing = Listing::build(&snapshot, &selector, args, now);
    let rows = Rows::render(&listing.rows, args.format()).pub_result(ErrorType::Input)?;

    let message = match args.format() {
        // Keep machine-readable output free of trailing prose.
        OutputFormat::Csv | OutputFormat::Json => rows.to_string(),
        OutputFormat::Table if listing.rows.is_empty() => {
            format!("No transactions for {}", listing.period)
        }
        OutputFormat::Table => format!(
            "{rows}\n{} transactions for {}: income {}, expense {}, balance {}",
            listing.count,
            listing.period,
            Amount::from_f64(listing.totals.income),
            Amount::from_f64(listing.totals.expense),
            Amount::from_f64(listing.totals.total),
        ),
    };
    Ok(Out::new(message, listing))
}

fn markdown_table(rows: &[ListRow]) -> String {
    let header = ["Date", "Description", "Category", "Amount"];
    let body: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.date.to_string(),
                r.description.replace('|', "\\|"),
                format!("{} {}", r.icon, r.label),
                r.amount.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c}{}", " ".repeat(w - c.chars().count())))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(line(&header.map(String::from)));
    out.push(format!(
        "|{}|",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in &body {
        out.push(line(row));
    }
    out.join("\n")
}

fn csv_rows(rows: &[ListRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "date", "description", "category", "amount"])?;
    for r in rows {
        let date = r.date.to_string();
        let amount = r.amount.with_format(AmountFormat::plain()).to_string();
        writer.write_record([
            r.id.as_str(),
            date.as_str(),
            r.description.as_str(),
            r.category.as_str(),
            amount.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish writing CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}
