//! Product repository.
//!
//! Listing queries only ever return `available` products. Cart and checkout
//! code resolves products by ID regardless of availability so that items
//! already in a cart keep their line until the customer removes them.

use rust_decimal::Decimal;
use sqlx::PgPool;

use nepal_clothing_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, category_id, name, slug, description, price, image, \
                               available, created_at, updated_at";

/// Product fields for insert/update (catalog seeding).
#[derive(Debug, Clone)]
pub struct NewProduct<'p> {
    pub category_id: CategoryId,
    pub name: &'p str,
    pub slug: &'p str,
    pub description: &'p str,
    pub price: Decimal,
    pub image: Option<&'p str>,
    pub available: bool,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List available products ordered by name.
    ///
    /// # Arguments
    ///
    /// * `category` - Restrict to one category
    /// * `limit` - Maximum number of rows (all when `None`)
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available(
        &self,
        category: Option<CategoryId>,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM store.product
            WHERE available
              AND ($1::INTEGER IS NULL OR category_id = $1)
            ORDER BY name ASC, id ASC
            LIMIT $2
            "
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get an available product by ID and slug (detail page lookup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available(
        &self,
        id: ProductId,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM store.product
            WHERE id = $1 AND slug = $2 AND available
            "
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Get an available product by ID (add-to-cart lookup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM store.product
            WHERE id = $1 AND available
            "
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Get all products with the given IDs, in ID order.
    ///
    /// IDs that do not exist are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM store.product
            WHERE id = ANY($1)
            ORDER BY id ASC
            "
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(raw_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Insert a product, or update it if `(category_id, slug)` already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, product: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO store.product
                (category_id, name, slug, description, price, image, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (category_id, slug) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                image = EXCLUDED.image,
                available = EXCLUDED.available,
                updated_at = now()
            RETURNING {PRODUCT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(product.category_id)
            .bind(product.name)
            .bind(product.slug)
            .bind(product.description)
            .bind(product.price)
            .bind(product.image)
            .bind(product.available)
            .fetch_one(self.pool)
            .await?;

        Ok(row)
    }
}
