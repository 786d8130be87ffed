//! Cached catalog lookups.
//!
//! The category list is rendered on every listing page, so it is kept in a
//! `moka` cache (5-minute TTL). Lookups that decide whether a page exists go
//! to the database, and a category missing from the cached list refreshes it.
//! Products are always read fresh because their availability and price matter
//! to the cart.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use crate::db::{CategoryRepository, RepositoryError};
use crate::models::Category;

const CATEGORIES_KEY: &str = "categories";

/// Shared, cloneable catalog cache.
#[derive(Clone)]
pub struct CatalogCache {
    categories: Cache<&'static str, Arc<Vec<Category>>>,
}

impl CatalogCache {
    /// Create a cache with the default 5-minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(300))
    }

    /// Create a cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        let categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(ttl)
            .build();

        Self { categories }
    }

    /// All categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the cache is cold and the query fails.
    pub async fn categories(&self, pool: &PgPool) -> Result<Arc<Vec<Category>>, RepositoryError> {
        if let Some(categories) = self.categories.get(CATEGORIES_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(CategoryRepository::new(pool).list().await?);
        self.categories
            .insert(CATEGORIES_KEY, Arc::clone(&categories))
            .await;

        Ok(categories)
    }

    /// Find a category by slug, reading the database rather than the cache.
    ///
    /// Categories can be seeded by another process while the list is cached;
    /// when the found category is missing from the cached list, the list is
    /// dropped so the next [`CatalogCache::categories`] call reloads it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_by_slug(
        &self,
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let Some(category) = CategoryRepository::new(pool).get_by_slug(slug).await? else {
            return Ok(None);
        };

        let stale = self
            .categories
            .get(CATEGORIES_KEY)
            .await
            .is_some_and(|cached| !cached.iter().any(|c| c == &category));
        if stale {
            debug!(slug, "Category list out of date, invalidating cache");
            self.invalidate_all().await;
        }

        Ok(Some(category))
    }

    /// Drop all cached data.
    pub async fn invalidate_all(&self) {
        self.categories.invalidate_all();
        self.categories.run_pending_tasks().await;
    }

    /// Number of cached entries (after pending maintenance).
    pub async fn entry_count(&self) -> u64 {
        self.categories.run_pending_tasks().await;
        self.categories.entry_count()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("entries", &self.categories.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_cache_is_empty() {
        let cache = CatalogCache::new();
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_entries() {
        let cache = CatalogCache::with_ttl(Duration::from_secs(60));
        cache
            .categories
            .insert(CATEGORIES_KEY, Arc::new(Vec::new()))
            .await;
        assert_eq!(cache.entry_count().await, 1);

        cache.invalidate_all().await;
        assert_eq!(cache.entry_count().await, 0);
    }
}
