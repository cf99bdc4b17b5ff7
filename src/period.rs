//! Calendar periods: ISO weeks, calendar months, and the period selector used to pick a time
//! window for filtering.

use crate::Result;
use anyhow::{bail, Context};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Returns the ISO-8601 week containing `date`.
///
/// The date is moved to the Thursday of its Monday-based week; the year of that Thursday is the
/// ISO year and the Thursday's day-of-year gives the week number. So 2024-01-01 (a Monday) is in
/// week 1 of 2024, while 2021-01-03 (a Sunday) is in week 53 of 2020.
pub fn week_of(date: NaiveDate) -> IsoWeek {
    let weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date
        .checked_add_signed(Duration::days(4 - weekday))
        .unwrap_or(date);
    IsoWeek {
        year: thursday.year(),
        week: thursday.ordinal().div_ceil(7),
    }
}

/// Returns the calendar month containing `date`.
pub fn month_of(date: NaiveDate) -> YearMonth {
    YearMonth {
        year: date.year(),
        month: date.month(),
    }
}

/// An ISO-8601 week, written `YYYY-Www`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IsoWeek {
    year: i32,
    week: u32,
}

impl IsoWeek {
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            bail!("Week number {week} is out of range, expected 1 to 53")
        }
        Ok(Self { year, week })
    }

    /// The ISO week-numbering year, which can differ from the calendar year near January 1.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        week_of(date) == *self
    }
}

impl Display for IsoWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeek {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, week) = s
            .split_once("-W")
            .or_else(|| s.split_once("-w"))
            .with_context(|| format!("Invalid week '{s}', expected the form 2024-W01"))?;
        let year = year
            .parse::<i32>()
            .with_context(|| format!("Invalid year in week '{s}'"))?;
        let week = week
            .parse::<u32>()
            .with_context(|| format!("Invalid week number in week '{s}'"))?;
        IsoWeek::new(year, week)
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Month {month} is out of range, expected 1 to 12")
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .with_context(|| format!("Invalid month '{s}', expected the form 2024-01"))?;
        let year = year
            .parse::<i32>()
            .with_context(|| format!("Invalid year in month '{s}'"))?;
        let month = month
            .parse::<u32>()
            .with_context(|| format!("Invalid month number in month '{s}'"))?;
        YearMonth::new(year, month)
    }
}

/// The size of the buckets used when grouping transactions over time.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
}

serde_plain::derive_display_from_serialize!(Granularity);
serde_plain::derive_fromstr_from_deserialize!(Granularity);

/// Identifies one bucket of a given granularity. Keys of the same granularity order
/// chronologically.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week(IsoWeek),
    Month(YearMonth),
}

impl PeriodKey {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Week => PeriodKey::Week(week_of(date)),
            Granularity::Month => PeriodKey::Month(month_of(date)),
        }
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PeriodKey::Week(w) => Display::fmt(w, f),
            PeriodKey::Month(m) => Display::fmt(m, f),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A user-chosen time window. A month or week without an explicit value means the one that
/// contains "now" when the selector is resolved.
///
/// Text forms: `all`, `month`, `month:2024-01`, `week`, `week:2024-W01`. A bare `2024-01` or
/// `2024-W01` is accepted too.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PeriodSelector {
    #[default]
    All,
    Month(Option<YearMonth>),
    Week(Option<IsoWeek>),
}

impl PeriodSelector {
    /// Pins the selector to a concrete period using `now` for any missing value.
    pub fn resolve(&self, now: NaiveDate) -> Period {
        match self {
            PeriodSelector::All => Period::All,
            PeriodSelector::Month(m) => Period::Month(m.unwrap_or_else(|| month_of(now))),
            PeriodSelector::Week(w) => Period::Week(w.unwrap_or_else(|| week_of(now))),
        }
    }
}

impl Display for PeriodSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodSelector::All => write!(f, "all"),
            PeriodSelector::Month(None) => write!(f, "month"),
            PeriodSelector::Month(Some(m)) => write!(f, "month:{m}"),
            PeriodSelector::Week(None) => write!(f, "week"),
            PeriodSelector::Week(Some(w)) => write!(f, "week:{w}"),
        }
    }
}

impl FromStr for PeriodSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind.trim(), Some(value.trim())),
            None => (s, None),
        };
        match (kind.to_ascii_lowercase().as_str(), value) {
            ("all", None) => Ok(PeriodSelector::All),
            ("month", None) => Ok(PeriodSelector::Month(None)),
            ("month", Some(v)) => Ok(PeriodSelector::Month(Some(v.parse()?))),
            ("week", None) => Ok(PeriodSelector::Week(None)),
            ("week", Some(v)) => Ok(PeriodSelector::Week(Some(v.parse()?))),
            (other, None) if other.contains("-w") => Ok(PeriodSelector::Week(Some(s.parse()?))),
            (other, None) if other.contains('-') => Ok(PeriodSelector::Month(Some(s.parse()?))),
            _ => bail!(
                "Invalid period '{s}', expected one of: all, month, month:YYYY-MM, week, \
                week:YYYY-Www"
            ),
        }
    }
}

impl Serialize for PeriodSelector {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodSelector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PeriodSelector::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A concrete time window produced by `PeriodSelector::resolve`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Period {
    All,
    Month(YearMonth),
    Week(IsoWeek),
}

impl Period {
    /// Returns true if `date` falls in this period. Dates are classified by their own period only.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::All => true,
            Period::Month(m) => m.contains(date),
            Period::Week(w) => w.contains(date),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::All => write!(f, "all time"),
            Period::Month(m) => Display::fmt(m, f),
            Period::Week(w) => Display::fmt(w, f),
        }
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
