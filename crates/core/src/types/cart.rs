//! Session-resident shopping cart.
//!
//! The cart is a mapping from product ID to a quantity plus a snapshot of the
//! product's name and price taken when it was first added. It is serialized
//! into the user's session as a JSON object keyed by product ID:
//!
//! ```json
//! {"3": {"quantity": 2, "name": "Dhaka Topi", "price": "850.00"}}
//! ```
//!
//! Cart operations never fail: unknown IDs are ignored. Totals are computed
//! by the storefront against current product prices, not the snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub quantity: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// A shopping cart keyed by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: BTreeMap<ProductId, CartEntry>,
}

impl Cart {
    /// Largest quantity a single entry can hold; matches the order item column.
    pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new entry with quantity 1 is created from the snapshot.
    pub fn add(&mut self, product_id: ProductId, name: &str, price: Decimal) {
        self.entries
            .entry(product_id)
            .and_modify(|entry| {
                entry.quantity = entry.quantity.saturating_add(1).min(Self::MAX_QUANTITY);
            })
            .or_insert_with(|| CartEntry {
                quantity: 1,
                name: name.to_owned(),
                price,
            });
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero or less removes the entry; larger values are capped
    /// at [`Cart::MAX_QUANTITY`]. Products that are not in the cart are left
    /// alone. Returns `true` if the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(entry) = self.entries.get_mut(&product_id) else {
            return false;
        };

        if quantity <= 0 {
            self.entries.remove(&product_id);
        } else {
            entry.quantity = u32::try_from(quantity)
                .unwrap_or(u32::MAX)
                .min(Self::MAX_QUANTITY);
        }
        true
    }

    /// Remove a product. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.entries.remove(&product_id).is_some()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.get(&product_id)
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of units across all products.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .values()
            .fold(0_u32, |acc, entry| acc.saturating_add(entry.quantity))
    }

    /// Product IDs in the cart, in ascending order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries.keys().copied().collect()
    }

    /// Iterate over entries in product ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, &CartEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}
