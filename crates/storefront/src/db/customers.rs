//! Customer profile repository.

use sqlx::{PgConnection, PgPool};

use nepal_clothing_core::{CustomerId, UserId};

use super::RepositoryError;
use crate::models::Customer;

/// Phone and address saved to the customer profile at checkout.
#[derive(Debug, Clone, Copy)]
pub struct CustomerContact<'c> {
    pub phone: &'c str,
    pub address: &'c str,
}

/// Repository for customer profile operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the customer profile for a user, creating an empty one if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Customer, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        get_or_create_on(&mut conn, user_id).await
    }
}

/// Get or create the customer profile for a user on an open connection.
///
/// Used inside the checkout transaction so the profile and the order are
/// written together.
pub(crate) async fn get_or_create_on(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Customer, RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO store.customer (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return RepositoryError::NotFound;
        }
        RepositoryError::Database(e)
    })?;

    let customer = sqlx::query_as::<_, Customer>(
        r"
        SELECT id, user_id, phone, address, created_at, updated_at
        FROM store.customer
        WHERE user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(customer)
}

/// Overwrite the stored phone and address on an open connection.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the customer does not exist.
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn update_contact_on(
    conn: &mut PgConnection,
    id: CustomerId,
    contact: &CustomerContact<'_>,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE store.customer
        SET phone = $2, address = $3, updated_at = now()
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(contact.phone)
    .bind(contact.address)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
