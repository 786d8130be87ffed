//! Pricing of the session cart against the current catalog.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{instrument, warn};

use nepal_clothing_core::{Cart, OrderTotals, ProductId, line_total};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{NewOrderItem, Product};

/// A cart entry joined with its current product row.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// Current price × quantity.
    pub total: Decimal,
}

/// Cart lines at current prices plus totals.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<CartLine>,
    pub totals: OrderTotals,
    /// Cart entries whose product no longer exists.
    pub missing: Vec<ProductId>,
}

impl PricedCart {
    /// Join cart entries with the given products.
    ///
    /// Lines follow cart order. Entries without a matching product are
    /// reported in `missing` and excluded from the totals.
    #[must_use]
    pub fn build(cart: &Cart, products: Vec<Product>) -> Self {
        let mut products = products;
        let mut lines = Vec::with_capacity(cart.len());
        let mut missing = Vec::new();

        for (product_id, entry) in cart.iter() {
            match products.iter().position(|p| p.id == product_id) {
                Some(idx) => {
                    let product = products.swap_remove(idx);
                    lines.push(CartLine {
                        total: line_total(product.price, entry.quantity),
                        quantity: entry.quantity,
                        product,
                    });
                }
                None => missing.push(product_id),
            }
        }

        let totals = OrderTotals::from_lines(lines.iter().map(|l| (l.product.price, l.quantity)));

        Self {
            lines,
            totals,
            missing,
        }
    }

    /// Whether no purchasable lines remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Order items capturing current prices.
    #[must_use]
    pub fn order_items(&self) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product.id,
                price: line.product.price,
                quantity: line.quantity,
            })
            .collect()
    }
}

/// Load current products for every cart entry and price the cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the product query fails.
#[instrument(skip(pool, cart), fields(entries = cart.len()))]
pub async fn resolve_cart(pool: &PgPool, cart: &Cart) -> Result<PricedCart, RepositoryError> {
    let products = ProductRepository::new(pool)
        .get_many(&cart.product_ids())
        .await?;

    let priced = PricedCart::build(cart, products);
    for product_id in &priced.missing {
        warn!(%product_id, "Cart references a product that no longer exists; skipping");
    }

    Ok(priced)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use nepal_clothing_core::{CategoryId, SHIPPING_FLAT};

    use super::*;

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            category_id: CategoryId::new(1),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: String::new(),
            price,
            image: None,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_uses_current_prices() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Product 1", Decimal::new(100_00, 2));
        cart.add(ProductId::new(1), "Product 1", Decimal::new(100_00, 2));

        // Price changed since the item was added
        let priced = PricedCart::build(&cart, vec![product(1, Decimal::new(150_00, 2))]);

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].quantity, 2);
        assert_eq!(priced.lines[0].total, Decimal::new(300_00, 2));
        assert_eq!(priced.totals.subtotal, Decimal::new(300_00, 2));
        assert_eq!(priced.totals.tax, Decimal::new(39_00, 2));
        assert_eq!(
            priced.totals.grand_total,
            Decimal::new(339_00, 2) + SHIPPING_FLAT
        );
    }

    #[test]
    fn test_build_skips_missing_products() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Kept", Decimal::new(500, 0));
        cart.add(ProductId::new(2), "Deleted", Decimal::new(900, 0));

        let priced = PricedCart::build(&cart, vec![product(1, Decimal::new(500, 0))]);

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.missing, vec![ProductId::new(2)]);
        assert_eq!(priced.totals.subtotal, Decimal::new(500, 0));
    }

    #[test]
    fn test_build_empty_cart() {
        let priced = PricedCart::build(&Cart::new(), Vec::new());
        assert!(priced.is_empty());
        assert_eq!(priced.totals.grand_total, SHIPPING_FLAT);
        assert!(priced.order_items().is_empty());
    }

    #[test]
    fn test_order_items_follow_cart_order() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(5), "B", Decimal::new(10, 0));
        cart.add(ProductId::new(3), "A", Decimal::new(20, 0));
        cart.set_quantity(ProductId::new(3), 4);

        let priced = PricedCart::build(
            &cart,
            vec![product(5, Decimal::new(10, 0)), product(3, Decimal::new(20, 0))],
        );
        let items = priced.order_items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, ProductId::new(3));
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[0].price, Decimal::new(20, 0));
        assert_eq!(items[1].product_id, ProductId::new(5));
    }
}
