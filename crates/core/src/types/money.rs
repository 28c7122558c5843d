//! Monetary amounts with decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with its ISO 4217 currency code.
///
/// The platform serializes amounts as decimal strings (`"19.99"`), which is
/// preserved here via `rust_decimal`'s string serde. Amounts are in the
/// currency's standard unit (dollars, not cents); [`Money::minor_units`]
/// converts for processors that bill in the smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount in the currency's standard unit.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g. "USD").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: String) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency_code: &str) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code: currency_code.to_owned(),
        }
    }

    /// The amount in the currency's smallest unit (e.g. cents), rounded to
    /// the nearest whole unit. Payment processors bill in minor units.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        (self.amount * Decimal::from(100))
            .round()
            .try_into()
            .unwrap_or(0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency_code)
    }
}
