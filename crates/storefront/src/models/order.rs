//! Orders and order items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use nepal_clothing_core::{
    CustomerId, OrderId, OrderItemId, OrderTotals, PaymentMethod, ProductId, line_total,
};

/// A persisted purchase.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub paid: bool,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub notes: String,
    /// Stored payment method code (see [`PaymentMethod::code`]).
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Parsed payment method, defaulting to cash on delivery for unknown codes.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method.parse().unwrap_or_default()
    }
}

/// A line of an order, with the price captured at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product name at read time (joined from `store.product`).
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl OrderItem {
    /// Quantity as an unsigned count (rows are constrained to `quantity > 0`).
    #[must_use]
    pub fn quantity(&self) -> u32 {
        u32::try_from(self.quantity).unwrap_or(0)
    }

    /// Price × quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        line_total(self.price, self.quantity())
    }
}

/// Order header to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub paid: bool,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub notes: String,
    pub payment_method: PaymentMethod,
}

/// Order line to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: u32,
}

/// An order together with its items and computed totals.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
}

impl PlacedOrder {
    /// Assemble an order and compute totals from its items.
    #[must_use]
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let totals = OrderTotals::from_lines(items.iter().map(|i| (i.price, i.quantity())));
        Self {
            order,
            items,
            totals,
        }
    }
}
