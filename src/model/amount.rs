//! Amount type for handling monetary values as they appear in bank exports.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may use a comma as the decimal separator and spaces as thousands separators.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use tracing::warn;

/// Represents a monetary amount, e.g. a payment sum or a cashback value.
///
/// Negative values are expenses, positive values are income. The sign is the only signal of
/// direction.
///
/// # Examples
///
/// Parsing a value written with a decimal comma:
/// ```
/// # use bank_views::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-1 234,50").unwrap();
/// assert_eq!(amount.to_string(), "-1,234.50");
/// ```
///
/// Serializing produces a JSON number:
/// ```
/// # use bank_views::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-118.12").unwrap();
/// assert_eq!(serde_json::to_string(&amount).unwrap(), "-118.12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is an expense, i.e. strictly below zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Creates an Amount from a floating point value, such as a numeric spreadsheet cell.
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(|d| Self(d.normalize()))
    }

    /// The value as a float, used for JSON output.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
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

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Spaces (including no-break spaces) are thousands separators in Russian exports.
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
            .collect();

        if compact.is_empty() {
            return Ok(Amount::default());
        }

        let normalized = match (compact.contains(','), compact.contains('.')) {
            // "1,234.50": commas are thousands separators
            (true, true) => compact.replace(',', ""),
            // "1234,50": comma is the decimal separator
            (true, false) => compact.replace(',', "."),
            _ => compact,
        };

        let value = Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", self.0.abs().to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Amount::from_f64(n)
                .ok_or_else(|| serde::de::Error::custom(format!("{n} is not a finite amount"))),
            Raw::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at `Decimal::MAX` or `Decimal::MIN` instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        match self.0.checked_add(rhs.0) {
            Some(value) => Amount(value),
            None => {
                warn!("Adding {self:?} and {rhs:?} overflows, the total is clamped");
                Amount(self.0.saturating_add(rhs.0))
            }
        }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
