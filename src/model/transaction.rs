use crate::model::amount::parse_decimal;
use crate::model::Category;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Category key assigned when a record has none.
const DEFAULT_CATEGORY: &str = "other";

/// A single income or expense record from the transaction store.
///
/// The sign of `amount` encodes direction: positive is income, negative is expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: String,
    owner: String,
    description: String,
    amount: f64,
    date: NaiveDate,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            description: description.into(),
            amount,
            date,
            category: category.into(),
            created_at: None,
        }
    }

    /// Validates a raw store record. Records without a usable date or amount are rejected with
    /// the reason so the caller can skip them.
    pub fn from_raw(id: impl Into<String>, raw: RawTransaction) -> Result<Self, SkipReason> {
        let amount = parse_amount(raw.amount.as_ref())?;
        let date = parse_date(raw.date.as_ref())?;
        let category = match raw.category.clone() {
            None | Some(Value::Null) => DEFAULT_CATEGORY.to_string(),
            Some(Value::String(s)) if s.trim().is_empty() => DEFAULT_CATEGORY.to_string(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        };
        Ok(Self {
            id: id.into(),
            owner: raw.owner().unwrap_or_default(),
            description: raw.description().unwrap_or_default(),
            amount,
            date,
            category,
            created_at: raw.created_at.as_ref().and_then(parse_timestamp),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The category key exactly as stored.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The category used for display; unknown keys map to `Other`.
    pub fn category_kind(&self) -> Category {
        Category::from_key(&self.category)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// A transaction record as it appears in a store snapshot, before validation.
///
/// Field names follow the document store (`uid`, `text`, `createdAt`); the descriptive names
/// `owner` and `description` are accepted as well, and the store names win when both are
/// present. Every field is a loose `Value` so that one bad record cannot fail the whole
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub uid: Option<Value>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
}

impl RawTransaction {
    /// The owning user id, read from `uid` and then `owner`.
    pub fn owner(&self) -> Option<String> {
        scalar_text(self.uid.as_ref()).or_else(|| scalar_text(self.owner.as_ref()))
    }

    /// The free text, read from `text` and then `description`.
    pub fn description(&self) -> Option<String> {
        scalar_text(self.text.as_ref()).or_else(|| scalar_text(self.description.as_ref()))
    }
}

/// Why a raw record was left out of the working set.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SkipReason {
    MissingAmount,
    InvalidAmount(String),
    MissingDate,
    InvalidDate(String),
    /// The record is not an object of transaction fields.
    Malformed(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingAmount => write!(f, "the amount is missing"),
            SkipReason::InvalidAmount(v) => write!(f, "the amount '{v}' is not a number"),
            SkipReason::MissingDate => write!(f, "the date is missing"),
            SkipReason::InvalidDate(v) => write!(f, "the date '{v}' is not a calendar date"),
            SkipReason::Malformed(v) => write!(f, "the record is malformed: {v}"),
        }
    }
}

fn parse_amount(value: Option<&Value>) -> Result<f64, SkipReason> {
    let amount = match value {
        None | Some(Value::Null) => return Err(SkipReason::MissingAmount),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(SkipReason::MissingAmount),
        Some(Value::String(s)) => parse_decimal(s).ok().and_then(|(d, _)| d.to_f64()),
        Some(_) => None,
    };
    match amount {
        Some(a) if a.is_finite() => Ok(a),
        _ => Err(SkipReason::InvalidAmount(display_value(value))),
    }
}

fn parse_date(value: Option<&Value>) -> Result<NaiveDate, SkipReason> {
    let s = match value {
        None | Some(Value::Null) => return Err(SkipReason::MissingDate),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(SkipReason::MissingDate),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(SkipReason::InvalidDate(other.to_string())),
    };
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| SkipReason::InvalidDate(s.to_string()))
}

/// Reads a server timestamp, either RFC 3339 text or a `{seconds, nanoseconds}` object.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or_default();
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// Strings pass through and numbers or booleans are rendered as text. Anything else is ignored.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
