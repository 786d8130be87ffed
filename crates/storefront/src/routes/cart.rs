//! Cart route handlers.
//!
//! The cart lives in the session under `cart`. Every mutation redirects back
//! to `/cart`; unknown product IDs in remove/update are ignored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nepal_clothing_core::{ProductId, format_price};

use super::{NavView, TotalsView};
use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{RequireAuth, load_cart, save_cart};
use crate::services::{CartLine, PricedCart, resolve_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub name: String,
    pub url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.as_i32(),
            name: line.product.name.clone(),
            url: line.product.url(),
            quantity: line.quantity,
            unit_price: format_price(line.product.price),
            total: format_price(line.total),
        }
    }
}

/// Priced cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub totals: TotalsView,
}

impl From<&PricedCart> for CartView {
    fn from(cart: &PricedCart) -> Self {
        Self {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            totals: TotalsView::from(&cart.totals),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub quantity: Option<String>,
}

/// Interpret the posted quantity.
///
/// A missing field means 1. Anything that is not an integer yields `None`
/// and the cart is left unchanged.
fn parse_quantity(raw: Option<&str>) -> Option<i64> {
    match raw.map(str::trim) {
        None => Some(1),
        Some(value) => value.parse().ok(),
    }
}

/// Parse a product ID path segment, treating garbage as not found.
fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display the cart with current prices and totals.
///
/// # Errors
///
/// Returns an error if the session or catalog cannot be read.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let priced = resolve_cart(state.pool(), &cart).await?;

    Ok(CartTemplate {
        nav: NavView::load(&session, Some(&user)).await,
        cart: CartView::from(&priced),
    })
}

/// Add one unit of a product to the cart.
///
/// # Errors
///
/// Returns 404 if the product does not exist or is unavailable.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Redirect> {
    let product_id = parse_product_id(&product_id)?;
    let product = ProductRepository::new(state.pool())
        .get_available_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut cart = load_cart(&session).await?;
    cart.add(product.id, &product.name, product.price);
    save_cart(&session, &cart).await?;

    let id = product.id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", id.as_str())]));

    Ok(Redirect::to("/cart"))
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
#[instrument(skip(session, user), fields(user_id = %user.id))]
pub async fn remove(
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Redirect> {
    let product_id = parse_product_id(&product_id)?;

    let mut cart = load_cart(&session).await?;
    if cart.remove(product_id) {
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Set the quantity of a product already in the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
#[instrument(skip(session, user, form), fields(user_id = %user.id))]
pub async fn update(
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
    Form(form): Form<UpdateQuantityForm>,
) -> Result<Redirect> {
    let product_id = parse_product_id(&product_id)?;

    let Some(quantity) = parse_quantity(form.quantity.as_deref()) else {
        tracing::debug!(raw = ?form.quantity, "Ignoring malformed quantity");
        return Ok(Redirect::to("/cart"));
    };

    let mut cart = load_cart(&session).await?;
    if cart.set_quantity(product_id, quantity) {
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_missing_defaults_to_one() {
        assert_eq!(parse_quantity(None), Some(1));
    }

    #[test]
    fn test_parse_quantity_values() {
        assert_eq!(parse_quantity(Some("3")), Some(3));
        assert_eq!(parse_quantity(Some(" 2 ")), Some(2));
        assert_eq!(parse_quantity(Some("0")), Some(0));
        assert_eq!(parse_quantity(Some("-1")), Some(-1));
    }

    #[test]
    fn test_parse_quantity_malformed() {
        assert_eq!(parse_quantity(Some("")), None);
        assert_eq!(parse_quantity(Some("two")), None);
        assert_eq!(parse_quantity(Some("1.5")), None);
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("12").unwrap_or(ProductId::new(0)), ProductId::new(12));
        assert!(matches!(parse_product_id("abc"), Err(AppError::NotFound(_))));
    }
}
