//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::CatalogCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: CatalogCache,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state, loading content pages from
    /// `config.content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, ContentError> {
        let content = ContentStore::load(&config.content_dir)?;
        Ok(Self::with_content(config, pool, content))
    }

    /// Create application state with an already-loaded content store.
    #[must_use]
    pub fn with_content(config: StorefrontConfig, pool: PgPool, content: ContentStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog: CatalogCache::new(),
                content,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// Get a reference to the content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
