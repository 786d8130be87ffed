//! Payment method recorded on an order.
//!
//! No payment is collected online; the method is stored so staff know how to
//! settle the order on delivery.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash collected by the courier (`cod`).
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    /// eSewa mobile wallet.
    Esewa,
    /// Khalti mobile wallet.
    Khalti,
    /// Direct bank transfer.
    BankTransfer,
}

/// The payment method string was not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl PaymentMethod {
    /// All selectable methods, in the order shown at checkout.
    pub const ALL: [Self; 4] = [
        Self::CashOnDelivery,
        Self::Esewa,
        Self::Khalti,
        Self::BankTransfer,
    ];

    /// Value stored in the database and posted by the checkout form.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::Esewa => "esewa",
            Self::Khalti => "khalti",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Esewa => "eSewa",
            Self::Khalti => "Khalti",
            Self::BankTransfer => "Bank Transfer",
        }
    }

    /// Parse a posted form value, falling back to cash on delivery.
    ///
    /// Returns the method and whether the fallback was used.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> (Self, bool) {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => (Self::default(), false),
            Some(v) => v.parse().map_or((Self::default(), true), |m| (m, false)),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPaymentMethod(s.to_owned()))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
