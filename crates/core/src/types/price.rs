//! Type-safe price representation using decimal arithmetic.
//!
//! All catalog prices and order totals are BRL amounts carried as
//! [`rust_decimal::Decimal`] to avoid binary floating point in money math.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A BRL price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount in reais.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Amount in reais.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display in the Brazilian convention (e.g. `9,90`).
    ///
    /// The currency sign is left to the caller so templates can typeset
    /// `R$` separately from the amount.
    #[must_use]
    pub fn display(&self) -> String {
        let cents = (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or_default();
        format!("{},{:02}", cents / 100, (cents % 100).abs())
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {}", self.display())
    }
}
