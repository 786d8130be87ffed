//! User repository for database operations.
//!
//! Accounts live in `store.user`; every user also gets a `store.customer`
//! profile, created in the same transaction at registration.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nepal_clothing_core::{UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Row shape for credential lookups.
#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    id: UserId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, username, created_at
            FROM store.user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, username, password_hash, created_at
            FROM store.user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let username = Username::parse(&r.username).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
                })?;

                Ok(Some((
                    User {
                        id: r.id,
                        username,
                        created_at: r.created_at,
                    },
                    r.password_hash,
                )))
            }
            None => Ok(None),
        }
    }

    /// Create a user and their empty customer profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_customer(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO store.user (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "username already exists"))?;

        sqlx::query(
            r"
            INSERT INTO store.customer (user_id)
            VALUES ($1)
            ",
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }
}
