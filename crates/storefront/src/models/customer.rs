//! Customer profile linked one-to-one with a user account.

use chrono::{DateTime, Utc};

use nepal_clothing_core::{CustomerId, UserId};

/// Shipping profile for a user.
///
/// Created at registration and lazily at checkout. `phone` and `address`
/// are filled from the most recent checkout with complete contact details.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
