//! Order repository.
//!
//! The customer profile update, the order header and its lines are written in
//! a single transaction so a failed checkout leaves nothing behind.

use sqlx::PgPool;

use nepal_clothing_core::{OrderId, UserId};

use super::RepositoryError;
use super::customers::{self, CustomerContact};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, PlacedOrder};

const ORDER_COLUMNS: &str = "id, customer_id, paid, shipping_address, shipping_phone, notes, \
                             payment_method, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and all its items for the user's customer profile.
    ///
    /// The profile is created if missing and, when `contact` is given, its
    /// phone and address are overwritten. Everything happens in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a quantity does not fit the column.
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if any write fails; nothing is written.
    pub async fn create_with_items(
        &self,
        user_id: UserId,
        contact: Option<CustomerContact<'_>>,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<PlacedOrder, RepositoryError> {
        let quantities = items
            .iter()
            .map(|item| {
                i32::try_from(item.quantity).map_err(|_| {
                    RepositoryError::DataCorruption(format!(
                        "quantity {} out of range for product {}",
                        item.quantity, item.product_id
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await?;

        let customer = customers::get_or_create_on(&mut *tx, user_id).await?;
        if let Some(contact) = &contact {
            customers::update_contact_on(&mut *tx, customer.id, contact).await?;
        }

        let sql = format!(
            r"
            INSERT INTO store.order
                (customer_id, paid, shipping_address, shipping_phone, notes, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "
        );

        let created = sqlx::query_as::<_, Order>(&sql)
            .bind(customer.id)
            .bind(order.paid)
            .bind(&order.shipping_address)
            .bind(&order.shipping_phone)
            .bind(&order.notes)
            .bind(order.payment_method.code())
            .fetch_one(&mut *tx)
            .await?;

        let mut lines = Vec::with_capacity(items.len());
        for (item, quantity) in items.iter().zip(quantities) {
            let line = sqlx::query_as::<_, OrderItem>(
                r"
                WITH inserted AS (
                    INSERT INTO store.order_item (order_id, product_id, price, quantity)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, order_id, product_id, price, quantity
                )
                SELECT i.id, i.order_id, i.product_id, p.name AS product_name,
                       i.price, i.quantity
                FROM inserted i
                JOIN store.product p ON p.id = i.product_id
                ",
            )
            .bind(created.id)
            .bind(item.product_id)
            .bind(item.price)
            .bind(quantity)
            .fetch_one(&mut *tx)
            .await?;

            lines.push(line);
        }

        tx.commit().await?;

        Ok(PlacedOrder::new(created, lines))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM store.order WHERE id = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// Get the items of an order with current product names, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT i.id, i.order_id, i.product_id, p.name AS product_name,
                   i.price, i.quantity
            FROM store.order_item i
            JOIN store.product p ON p.id = i.product_id
            WHERE i.order_id = $1
            ORDER BY i.id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
