//! Catalog records: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use nepal_clothing_core::{CategoryId, ProductId};

/// A product category (e.g. "Shawls", "Topi").
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    /// Image path relative to `/static`, if any.
    pub image: Option<String>,
    /// Unavailable products are hidden from listings and cannot be added to a cart.
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Canonical detail page URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/products/{}/{}", self.id, self.slug)
    }
}
