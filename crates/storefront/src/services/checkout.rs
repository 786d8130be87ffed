//! Order placement from the session cart.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nepal_clothing_core::{Cart, PaymentMethod, ShippingDetails, ShippingError, UserId};

use super::cart::resolve_cart;
use crate::db::{CustomerContact, OrderRepository, RepositoryError};
use crate::models::{NewOrder, PlacedOrder};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no purchasable products.
    #[error("cart is empty")]
    EmptyCart,

    /// The shipping details cannot be stored.
    #[error("{0}")]
    InvalidDetails(#[from] ShippingError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn the cart into a paid order for the user's customer profile.
    ///
    /// The customer's phone and address are overwritten when the submitted
    /// details are complete, in the same transaction as the order. Cart lines
    /// are priced at current product prices. The caller is responsible for
    /// clearing the session cart on success.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidDetails` if a field is too long to store.
    /// Returns `CheckoutError::EmptyCart` if no cart product still exists.
    /// Returns `CheckoutError::Repository` if a database operation fails.
    #[instrument(skip(self, cart, details), fields(entries = cart.len()))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        cart: &Cart,
        details: &ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutError> {
        let details = details.normalized();
        details.validate()?;

        let priced = resolve_cart(self.pool, cart).await?;
        if priced.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer_address = details.customer_address();
        let contact = details.has_contact_details().then(|| CustomerContact {
            phone: &details.phone,
            address: &customer_address,
        });

        let placed = OrderRepository::new(self.pool)
            .create_with_items(
                user_id,
                contact,
                &new_order(&details, payment_method),
                &priced.order_items(),
            )
            .await?;

        tracing::info!(
            order_id = %placed.order.id,
            customer_id = %placed.order.customer_id,
            items = placed.items.len(),
            grand_total = %placed.totals.grand_total,
            "order placed"
        );

        Ok(placed)
    }
}

/// Order header for normalized shipping details.
///
/// No payment is taken online, so orders are recorded as paid at creation.
fn new_order(details: &ShippingDetails, payment_method: PaymentMethod) -> NewOrder {
    NewOrder {
        paid: true,
        shipping_address: details.shipping_address(),
        shipping_phone: details.phone.clone(),
        notes: details.notes.clone(),
        payment_method,
    }
}
