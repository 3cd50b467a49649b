//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! The ledger's balance invariant (sum of debits equals sum of credits to the
//! currency's minor unit) depends on this exactness.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    AUD,
    CAD,
    NZD,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places (minor units) for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::NZD => "NZD",
            Currency::JPY => "JPY",
        }
    }

    /// Parses an ISO 4217 code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "AUD" => Some(Currency::AUD),
            "CAD" => Some(Currency::CAD),
            "NZD" => Some(Currency::NZD),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 internal decimal places; `round_to_currency`
/// truncates to the currency's minor unit where exactness is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// The amount expressed in minor units, rounded to the currency precision
    ///
    /// Balance comparisons in the ledger use this representation so that two
    /// sums that differ below the minor unit never spuriously diverge.
    pub fn minor_units(&self) -> i64 {
        let scaled = self.amount * Decimal::new(10_i64.pow(self.currency.decimal_places()), 0);
        scaled.round().mantissa() as i64
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Multiplies by a scalar
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor, self.currency)
    }

    /// Subtraction floored at zero, used for exposure arithmetic where
    /// credit notes can exceed open invoices
    pub fn saturating_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        let diff = self.checked_sub(other)?;
        if diff.is_negative() {
            Ok(Money::zero(self.currency))
        } else {
            Ok(diff)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(f, "{} {:.dp$}", self.currency.code(), self.amount, dp = dp as usize)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

/// Represents a percentage rate (e.g., credit utilization)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Computes the ratio of `part` to `whole` as a rate
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::DivisionByZero` if `whole` is zero, and
    /// `CurrencyMismatch` if the currencies differ.
    pub fn ratio_of(part: &Money, whole: &Money) -> Result<Self, MoneyError> {
        if part.currency() != whole.currency() {
            return Err(MoneyError::CurrencyMismatch(
                part.currency().to_string(),
                whole.currency().to_string(),
            ));
        }
        if whole.amount().is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self::new(part.amount() / whole.amount()))
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage, rounded to 2 decimal places
    pub fn as_percentage(&self) -> Decimal {
        (self.value * dec!(100)).round_dp(2)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.minor_units(), 10050);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::USD);

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let eur = Money::new(dec!(100.00), Currency::EUR);

        let result = usd.checked_add(&eur);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let invoices = Money::new(dec!(100.00), Currency::USD);
        let credit_notes = Money::new(dec!(150.00), Currency::USD);

        let exposure = invoices.saturating_sub(&credit_notes).unwrap();
        assert!(exposure.is_zero());
    }

    #[test]
    fn test_jpy_has_no_minor_unit() {
        let m = Money::from_minor(500, Currency::JPY);
        assert_eq!(m.amount(), dec!(500));
    }

    #[test]
    fn test_ratio_of() {
        let part = Money::new(dec!(1050.00), Currency::USD);
        let whole = Money::new(dec!(1000.00), Currency::USD);

        let rate = Rate::ratio_of(&part, &whole).unwrap();
        assert_eq!(rate.as_percentage(), dec!(105.00));
    }

    #[test]
    fn test_ratio_of_zero_whole() {
        let part = Money::new(dec!(10.00), Currency::USD);
        let whole = Money::zero(Currency::USD);

        assert_eq!(Rate::ratio_of(&part, &whole), Err(MoneyError::DivisionByZero));
    }
}
