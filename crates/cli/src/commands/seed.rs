//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: Shawls
//!     slug: shawls
//!     products:
//!       - name: Pashmina Shawl
//!         slug: pashmina-shawl
//!         price: "4500.00"
//!         description: Hand-woven in Kathmandu.
//!         image: products/pashmina-shawl.jpg
//!         available: true
//! ```
//!
//! Categories are matched on `slug` and products on `(category, slug)`, so
//! re-running the command updates rows in place.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use nepal_clothing_storefront::config::{ConfigError, StorefrontConfig};
use nepal_clothing_storefront::db::products::NewProduct;
use nepal_clothing_storefront::db::{
    self, CategoryRepository, ProductRepository, RepositoryError,
};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

/// A category and its products.
#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A product entry.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl CatalogFile {
    /// Total number of products across all categories.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }
}

/// Check the catalog for problems the database would reject or silently merge.
#[must_use]
pub fn validate(catalog: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut category_slugs = HashSet::new();

    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            errors.push(format!("category '{}' has an empty name", category.slug));
        }
        if !is_slug(&category.slug) {
            errors.push(format!("category slug '{}' is not a valid slug", category.slug));
        }
        if !category_slugs.insert(category.slug.as_str()) {
            errors.push(format!("duplicate category slug '{}'", category.slug));
        }

        let mut product_slugs = HashSet::new();
        for product in &category.products {
            let label = format!("{}/{}", category.slug, product.slug);

            if product.name.trim().is_empty() {
                errors.push(format!("product '{label}' has an empty name"));
            }
            if !is_slug(&product.slug) {
                errors.push(format!("product slug '{label}' is not a valid slug"));
            }
            if !product_slugs.insert(product.slug.as_str()) {
                errors.push(format!("duplicate product slug '{label}'"));
            }
            if product.price.is_sign_negative() {
                errors.push(format!("product '{label}' has a negative price"));
            }
            if product.price.scale() > 2 && product.price != product.price.round_dp(2) {
                errors.push(format!(
                    "product '{label}' price {} has more than two decimal places",
                    product.price
                ));
            }
        }
    }

    errors
}

/// Lowercase ASCII letters, digits and hyphens.
fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Seed the catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, or if a
/// database operation fails.
pub async fn catalog(path: &Path) -> Result<(), SeedError> {
    let config = StorefrontConfig::from_env()?;

    info!(path = %path.display(), "Loading catalog from file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    let errors = validate(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    info!(
        categories = catalog.categories.len(),
        products = catalog.product_count(),
        "Catalog validated"
    );

    let pool = db::create_pool(&config.database_url).await?;
    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    for category_seed in &catalog.categories {
        let category = categories
            .upsert(category_seed.name.trim(), &category_seed.slug)
            .await?;

        for product_seed in &category_seed.products {
            products
                .upsert(&NewProduct {
                    category_id: category.id,
                    name: product_seed.name.trim(),
                    slug: &product_seed.slug,
                    description: product_seed.description.trim(),
                    price: product_seed.price,
                    image: product_seed.image.as_deref(),
                    available: product_seed.available,
                })
                .await?;
        }

        info!(
            category = %category.slug,
            products = category_seed.products.len(),
            "Seeded category"
        );
    }

    info!("Catalog seeding complete!");
    Ok(())
}
