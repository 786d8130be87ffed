//! Price arithmetic for carts and orders.
//!
//! Every total shown to a customer is derived from the same rule:
//!
//! ```text
//! subtotal    = Σ unit price × quantity
//! tax         = subtotal × 13%
//! grand total = subtotal + tax + flat shipping
//! ```
//!
//! Amounts are kept as exact [`Decimal`] values; rounding to two places only
//! happens when formatting for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Sales tax applied to the item subtotal (13%).
pub const TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Flat shipping charge added to every cart and order (Rs. 100.00).
pub const SHIPPING_FLAT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 2);

/// Currency prefix used when rendering prices.
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Format an amount for display, e.g. `Rs. 1250.50`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!(
        "{CURRENCY_PREFIX} {:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Subtotal, tax, shipping and grand total for a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub grand_total: Decimal,
}

impl OrderTotals {
    /// Compute totals from `(unit price, quantity)` pairs.
    ///
    /// Shipping is charged even when there are no lines; callers that must
    /// not act on an empty cart check for that themselves.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, u32)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(price, quantity)| line_total(price, quantity))
            .sum::<Decimal>();

        Self::from_subtotal(subtotal)
    }

    /// Compute totals from an already-summed item subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * TAX_RATE;
        let shipping = SHIPPING_FLAT;

        Self {
            subtotal,
            tax,
            shipping,
            grand_total: subtotal + tax + shipping,
        }
    }
}

/// Line total for a single item.
#[must_use]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price * Decimal::from(quantity)
}
