//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use nepal_clothing_core::{CategoryId, ProductId, format_price};

use super::NavView;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Category, Product};
use crate::state::AppState;

/// Category link data for templates.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub name: String,
    pub url: String,
    pub active: bool,
}

impl CategoryView {
    /// Build category links, marking `active` as selected.
    #[must_use]
    pub fn list(categories: &[Category], active: Option<CategoryId>) -> Vec<Self> {
        categories
            .iter()
            .map(|c| Self {
                name: c.name.clone(),
                url: format!("/products/category/{}", c.slug),
                active: Some(c.id) == active,
            })
            .collect()
    }
}

/// Product card data for listings.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            url: product.url(),
            price: format_price(product.price),
            image: product.image.as_ref().map(|path| static_image_url(path)),
        }
    }
}

/// Product detail data for templates.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<String>,
    pub add_to_cart_url: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price),
            image: product.image.as_ref().map(|path| static_image_url(path)),
            add_to_cart_url: format!("/cart/add/{}", product.id),
        }
    }
}

/// Public URL for an image stored under the static directory.
fn static_image_url(path: &str) -> String {
    format!("/static/{}", path.trim_start_matches('/'))
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub heading: String,
    pub categories: Vec<CategoryView>,
    pub products: Vec<ProductCardView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductDetailView,
}

/// Display all available products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let categories = state.catalog().categories(state.pool()).await?;
    let products = ProductRepository::new(state.pool())
        .list_available(None, None)
        .await?;

    Ok(ProductsIndexTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        heading: "All Products".to_owned(),
        categories: CategoryView::list(&categories, None),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}

/// Display available products of one category.
///
/// # Errors
///
/// Returns 404 if no category has this slug.
#[instrument(skip(state, session, user))]
pub async fn by_category(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let category = state
        .catalog()
        .category_by_slug(state.pool(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;
    let categories = state.catalog().categories(state.pool()).await?;

    let products = ProductRepository::new(state.pool())
        .list_available(Some(category.id), None)
        .await?;

    Ok(ProductsIndexTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        heading: category.name.clone(),
        categories: CategoryView::list(&categories, Some(category.id)),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}

/// Display a product detail page.
///
/// # Errors
///
/// Returns 404 unless the ID and slug match an available product.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path((id, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound(format!("product {id}/{slug}"));

    let product_id: ProductId = id.parse().map_err(|_| not_found())?;
    let product = ProductRepository::new(state.pool())
        .get_available(product_id, &slug)
        .await?
        .ok_or_else(not_found)?;

    Ok(ProductShowTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        product: ProductDetailView::from(&product),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(4),
            category_id: CategoryId::new(2),
            name: "Dhaka Topi".to_owned(),
            slug: "dhaka-topi".to_owned(),
            description: "Traditional cap".to_owned(),
            price: Decimal::new(850, 0),
            image: Some("products/2026/03/topi.jpg".to_owned()),
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_card_view() {
        let view = ProductCardView::from(&product());
        assert_eq!(view.url, "/products/4/dhaka-topi");
        assert_eq!(view.price, "Rs. 850.00");
        assert_eq!(
            view.image.as_deref(),
            Some("/static/products/2026/03/topi.jpg")
        );
    }

    #[test]
    fn test_product_detail_view() {
        let view = ProductDetailView::from(&product());
        assert_eq!(view.add_to_cart_url, "/cart/add/4");
        assert_eq!(view.description, "Traditional cap");
    }

    #[test]
    fn test_category_links_mark_active() {
        let categories = vec![
            Category {
                id: CategoryId::new(1),
                name: "Shawls".to_owned(),
                slug: "shawls".to_owned(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Topi".to_owned(),
                slug: "topi".to_owned(),
            },
        ];

        let links = CategoryView::list(&categories, Some(CategoryId::new(2)));
        assert_eq!(links[0].url, "/products/category/shawls");
        assert!(!links[0].active);
        assert!(links[1].active);
    }
}
