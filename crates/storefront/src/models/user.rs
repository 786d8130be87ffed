//! User domain types.

use chrono::{DateTime, Utc};

use nepal_clothing_core::{UserId, Username};

/// A storefront user account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
