//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the storefront as display text (`"$1,299.99"`), so
//! this module also owns the conversion from currency-formatted strings.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency symbols accepted in front of a price.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£'];

/// One trillion. Keeps `price * u32::MAX` and cart sums well inside `Decimal` range.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a number once currency symbols and separators are removed.
    #[error("invalid price format: {0:?}")]
    InvalidFormat(String),
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed {max}: {0}", max = Price::MAX)]
    TooLarge(Decimal),
}

/// A non-negative unit price in the store currency, at most [`Price::MAX`].
///
/// ## Examples
///
/// ```
/// use shopvista_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::parse("$1,299.99").unwrap();
/// assert_eq!(price.amount(), Decimal::new(129_999, 2));
///
/// assert!(Price::parse("free").is_err());
/// assert!(Price::parse("$1,29.99").is_err()); // misplaced separator
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted price, $1,000,000,000,000.00.
    pub const MAX: Self = Self(MAX_AMOUNT);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero and
    /// `PriceError::TooLarge` if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a currency-formatted price string.
    ///
    /// Accepts an optional leading currency symbol (`$`, `€`, `£`), surrounding
    /// whitespace, and comma thousands separators in the integer part. Commas
    /// must form proper 3-digit groups: `"1,299.99"` parses, `"1,29.99"` and
    /// `"12,,000"` do not.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::InvalidFormat` if the remaining text is not a plain
    /// decimal number, `PriceError::Negative` for amounts below zero and
    /// `PriceError::TooLarge` above [`Price::MAX`].
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let invalid = || PriceError::InvalidFormat(text.to_owned());

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let body = unsigned
            .strip_prefix(CURRENCY_SYMBOLS)
            .map_or(unsigned, str::trim_start);

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac)) => (int_part, Some(frac)),
            None => (body, None),
        };

        let digits = strip_thousands_separators(int_part).ok_or_else(invalid)?;
        let normalized = match frac_part {
            Some(frac) if !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()) => {
                format!("{digits}.{frac}")
            }
            Some(_) => return Err(invalid()),
            None => digits,
        };

        let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        if negative && !amount.is_zero() {
            return Err(PriceError::Negative(-amount));
        }
        Self::new(amount.abs())
    }

    /// The price as a decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. `Price::MAX * u32::MAX` is within range.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_money(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Format an amount for display, e.g. `$1,299.00`.
///
/// Rounds half away from zero to two decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

/// Remove comma thousands separators from an integer part.
///
/// Returns `None` unless the input is digits only, optionally grouped as
/// `d{1,3}(,ddd)*`.
fn strip_thousands_separators(int_part: &str) -> Option<String> {
    let mut groups = int_part.split(',');
    let first = groups.next()?;
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits = first.to_owned();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        grouped = true;
        digits.push_str(group);
    }

    if grouped && first.len() > 3 {
        return None;
    }
    Some(digits)
}
