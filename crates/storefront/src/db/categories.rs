//! Category repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug
            FROM store.category
            ORDER BY name ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug
            FROM store.category
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Insert a category, or update its name if the slug already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, name: &str, slug: &str) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO store.category (name, slug)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, slug
            ",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }
}
