//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use super::NavView;
use super::products::{CategoryView, ProductCardView};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Number of products featured on the home page.
pub const HOME_PRODUCT_LIMIT: i64 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub categories: Vec<CategoryView>,
    pub products: Vec<ProductCardView>,
}

/// Display the home page.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let categories = state.catalog().categories(state.pool()).await?;
    let products = ProductRepository::new(state.pool())
        .list_available(None, Some(HOME_PRODUCT_LIMIT))
        .await?;

    Ok(HomeTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        categories: CategoryView::list(&categories, None),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}
