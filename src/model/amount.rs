//! Amount type for presenting monetary values with an optional baht sign.
//!
//! The core computes in `f64` and never rounds. `Amount` is the presentation boundary: it rounds
//! to two decimal places with `Decimal` so that displayed figures do not drift, and it handles
//! parsing amounts that arrive as strings in a snapshot, e.g. `"-฿1,250.50"`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The currency sign used when formatting amounts.
pub const CURRENCY: char = '฿';

/// Represents how amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ symbol: true, commas: true }` -> `-฿60,000.00`
///  - `AmountFormat{ symbol: false, commas: true }` -> `-60,000.00`
///  - `AmountFormat{ symbol: false, commas: false }` -> `-60000.00`
///  - `AmountFormat{ symbol: true, commas: false }` -> `-฿60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether the currency sign is present in the formatting.
    symbol: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

impl AmountFormat {
    pub const fn new(symbol: bool, commas: bool) -> Self {
        Self { symbol, commas }
    }

    /// Plain numbers, e.g. `-60000.00`, as used for CSV output.
    pub const fn plain() -> Self {
        Self::new(false, false)
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format has a currency sign and commas: e.g. `-฿60,000.00`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    symbol: true,
    commas: true,
};

/// Represents an amount of money rounded to two decimal places.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
///
/// # Examples
///
/// ```
/// # use money_tracker::model::Amount;
/// let amount = Amount::from_f64(-1250.5);
/// assert_eq!(amount.to_string(), "-฿1,250.50");
/// ```
///
/// Parsing without a currency sign:
/// ```
/// # use money_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-50").unwrap();
/// assert_eq!(amount.to_string(), "-50.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The rounded numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub fn new(value: Decimal) -> Self {
        Self::new_with_format(value, DEFAULT_FORMAT)
    }

    /// Creates a new Amount from a Decimal value with the specified formatting.
    pub fn new_with_format(value: Decimal, format: AmountFormat) -> Self {
        let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(2);
        Self { value, format }
    }

    /// Rounds an accumulated `f64` to a presentable amount. Values that cannot be represented
    /// (NaN, infinities) become zero.
    pub fn from_f64(value: f64) -> Self {
        Self::new(Decimal::from_f64(value).unwrap_or_default())
    }

    /// Returns a copy of this amount that formats itself with `format`.
    pub fn with_format(self, format: AmountFormat) -> Self {
        Self { format, ..self }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Parses an amount string into its exact, unrounded value and the format it was written in.
pub(crate) fn parse_decimal(s: &str) -> Result<(Decimal, AmountFormat), AmountError> {
    let mut symbol = false;
    let trimmed = s.trim();

    let without_symbol = if let Some(after_minus) = trimmed.strip_prefix('-') {
        // Negative number: could be "-฿50.00" or "-50.00"
        if let Some(after_symbol) = after_minus.trim_start().strip_prefix(CURRENCY) {
            symbol = true;
            format!("-{}", after_symbol.trim_start())
        } else {
            trimmed.to_string()
        }
    } else if let Some(after_symbol) = trimmed.strip_prefix(CURRENCY) {
        symbol = true;
        after_symbol.trim_start().to_string()
    } else {
        trimmed.to_string()
    };

    let without_commas = without_symbol.replace(',', "");
    let commas = without_commas.len() < without_symbol.len();

    let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
    Ok((value, AmountFormat::new(symbol, commas)))
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, format) = parse_decimal(s)?;
        Ok(Amount::new_with_format(value, format))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value().abs())
        };

        let sym = if self.format.symbol {
            String::from(CURRENCY)
        } else {
            String::new()
        };

        if self.format.commas {
            write!(
                f,
                "{sign}{sym}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{sym}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::from_f64(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
