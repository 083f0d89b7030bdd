//! Payment method enumeration.

use serde::{Deserialize, Serialize};

/// How the customer pays on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    /// Wire value used by the checkout form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
        }
    }

    /// Human-readable label shown on the confirmation screen.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Cartão de crédito",
            Self::DebitCard => "Cartão de débito",
            Self::Cash => "Dinheiro",
        }
    }
}

/// Error parsing a payment method from its wire value.
#[derive(Debug, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct PaymentMethodError(String);

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            other => Err(PaymentMethodError(other.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
