//! Confirmed-order snapshot.
//!
//! Written to the session once per confirmed checkout and read by the
//! confirmation screen. Overwritten by the next confirmation; lost when the
//! session expires, in which case the confirmation screen redirects back to
//! checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coffee_delivery_core::{PaymentMethod, Price};

/// Fixed delivery fee, charged per order: R$ 3,50.
pub const DELIVERY_FEE: Price = Price::new(Decimal::from_parts(350, 0, 0, false, 2));

/// Validated delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code in `#####-###` form.
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    /// Two-letter region (UF) code.
    pub region: String,
}

/// Cost breakdown for a confirmed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl CostSummary {
    /// Build the breakdown from a cart subtotal plus the fixed delivery fee.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        Self {
            subtotal,
            delivery_fee: DELIVERY_FEE,
            total: subtotal + DELIVERY_FEE,
        }
    }
}

/// The finalized order: address, payment method and cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub cost: CostSummary,
}
