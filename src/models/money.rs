//! Money type for ledger amounts
//!
//! Amounts are stored as integer cents. Analytics work in `f64` and convert
//! back through [`Money::from_cents_f64`], which rounds half away from zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A signed amount in cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted for a single amount or balance ($10 billion)
    ///
    /// Sums over millions of such amounts still fit in an `i64`.
    pub const MAX_AMOUNT: Money = Money::from_dollars(10_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use fintrack::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Convert a fractional cent value, rounding half away from zero
    ///
    /// # Examples
    /// ```
    /// use fintrack::models::Money;
    /// assert_eq!(Money::from_cents_f64(2666.666).cents(), 2667);
    /// assert_eq!(Money::from_cents_f64(-0.5).cents(), -1);
    /// ```
    pub fn from_cents_f64(cents: f64) -> Self {
        debug_assert!(cents.is_finite(), "non-finite cent value {}", cents);
        if !cents.is_finite() {
            return Self::zero();
        }
        Self(cents.round() as i64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in cents as a float, for analytic arithmetic
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// The amount in currency units as a float (display and JSON reports)
    pub fn as_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whole units, truncated toward zero
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// `self + other`, or `None` on `i64` overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Whether the magnitude is within [`Money::MAX_AMOUNT`]
    pub fn within_limit(&self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_AMOUNT.0.unsigned_abs()
    }

    /// Parse an amount
    ///
    /// Accepts "10.50", "-10.50", "$10.50", ".75" and "10" (whole units).
    /// More than two decimal places is rejected rather than truncated, and so
    /// is anything beyond [`Money::MAX_AMOUNT`].
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let raw = s.trim();

        let (negative, rest) = match raw.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, raw),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        if rest.is_empty() {
            return Err(MoneyParseError::InvalidFormat(raw.to_string()));
        }

        let too_large = || MoneyParseError::TooLarge(raw.to_string());
        let cents = match rest.split_once('.') {
            Some((units, fraction)) => {
                if fraction.contains('.') || !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(MoneyParseError::InvalidFormat(raw.to_string()));
                }
                let units: i64 = if units.is_empty() {
                    0
                } else {
                    units
                        .parse()
                        .map_err(|_| MoneyParseError::InvalidFormat(raw.to_string()))?
                };
                let fraction_cents: i64 = match fraction.len() {
                    0 => 0,
                    1 => fraction.parse::<i64>().unwrap_or(0) * 10,
                    2 => fraction.parse().unwrap_or(0),
                    _ => return Err(MoneyParseError::TooPrecise(raw.to_string())),
                };
                units
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(fraction_cents))
                    .ok_or_else(too_large)?
            }
            None => rest
                .parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(raw.to_string()))?
                .checked_mul(100)
                .ok_or_else(too_large)?,
        };

        let amount = Self(if negative { -cents } else { cents });
        if !amount.within_limit() {
            return Err(too_large());
        }
        Ok(amount)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

// Operators saturate instead of panicking; amounts entering the ledger are
// bounded by `MAX_AMOUNT`, so saturation only guards hand-edited data files.
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise(s) => {
                write!(f, "Amount has more than two decimal places: {}", s)
            }
            MoneyParseError::TooLarge(s) => {
                write!(f, "Amount is larger than {}: {}", Money::MAX_AMOUNT, s)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
