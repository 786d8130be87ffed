//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page (categories + latest products)
//!
//! # Products
//! GET  /products                   - All available products
//! GET  /products/category/{slug}   - Products in a category
//! GET  /products/{id}/{slug}       - Product detail
//!
//! # Auth
//! GET  /auth/register              - Register page
//! POST /auth/register              - Register action
//! GET  /auth/login                 - Login page
//! POST /auth/login                 - Login action
//! GET  /auth/logout                - Logout
//! POST /auth/logout                - Logout
//!
//! # Cart (requires auth)
//! GET  /cart                       - Cart page
//! POST /cart/add/{product_id}      - Add one unit
//! POST /cart/remove/{product_id}   - Remove a product
//! POST /cart/update/{product_id}   - Set quantity
//!
//! # Checkout (requires auth)
//! GET  /checkout                   - Checkout form
//! POST /checkout                   - Place order
//!
//! # Pages (requires auth)
//! GET  /about-us                   - About Us
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use nepal_clothing_core::{OrderTotals, format_price};

use crate::middleware::load_cart;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Header data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct NavView {
    pub username: Option<String>,
    pub cart_items: u32,
}

impl NavView {
    /// Build the header for the current visitor.
    pub async fn load(session: &Session, user: Option<&CurrentUser>) -> Self {
        let cart_items = match load_cart(session).await {
            Ok(cart) => cart.item_count(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart for header");
                0
            }
        };

        Self {
            username: user.map(|u| u.username.to_string()),
            cart_items,
        }
    }
}

/// Formatted totals for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub grand_total: String,
}

impl From<&OrderTotals> for TotalsView {
    fn from(totals: &OrderTotals) -> Self {
        Self {
            subtotal: format_price(totals.subtotal),
            tax: format_price(totals.tax),
            shipping: format_price(totals.shipping),
            grand_total: format_price(totals.grand_total),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/category/{slug}", get(products::by_category))
        .route("/{id}/{slug}", get(products::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
        .route("/remove/{product_id}", post(cart::remove))
        .route("/update/{product_id}", post(cart::update))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .route("/about-us", get(pages::about_us))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_totals_view_formats_amounts() {
        let totals = OrderTotals::from_lines([(Decimal::new(1_250_50, 2), 2)]);
        let view = TotalsView::from(&totals);

        assert_eq!(view.subtotal, "Rs. 2501.00");
        assert_eq!(view.tax, "Rs. 325.13");
        assert_eq!(view.shipping, "Rs. 100.00");
        assert_eq!(view.grand_total, "Rs. 2926.13");
    }
}
