//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nepal_clothing_core::{MAX_PHONE_LENGTH, PaymentMethod, ShippingDetails, format_price};

use super::auth::capitalize;
use super::cart::CartView;
use super::{NavView, TotalsView};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, load_cart, save_cart};
use crate::models::PlacedOrder;
use crate::services::{CheckoutError, CheckoutService, resolve_cart};
use crate::state::AppState;

/// Payment method option for the checkout form.
#[derive(Debug, Clone)]
pub struct PaymentOptionView {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl PaymentOptionView {
    fn all(selected: PaymentMethod) -> Vec<Self> {
        PaymentMethod::ALL
            .into_iter()
            .map(|method| Self {
                code: method.code(),
                label: method.label(),
                selected: method == selected,
            })
            .collect()
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub cart: CartView,
    pub payment_methods: Vec<PaymentOptionView>,
    pub details: ShippingDetails,
    pub max_phone_length: usize,
    pub error: Option<String>,
}

/// Order line display data.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
}

/// Placed order display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub payment_method: &'static str,
    pub shipping_address: Vec<String>,
    pub shipping_phone: String,
    pub notes: String,
    pub lines: Vec<OrderLineView>,
    pub totals: TotalsView,
}

impl From<&PlacedOrder> for OrderView {
    fn from(placed: &PlacedOrder) -> Self {
        Self {
            id: placed.order.id.as_i32(),
            payment_method: placed.order.payment_method().label(),
            shipping_address: placed
                .order
                .shipping_address
                .lines()
                .map(str::to_owned)
                .collect(),
            shipping_phone: placed.order.shipping_phone.clone(),
            notes: placed.order.notes.clone(),
            lines: placed
                .items
                .iter()
                .map(|item| OrderLineView {
                    name: item.product_name.clone(),
                    quantity: item.quantity(),
                    unit_price: format_price(item.price),
                    total: format_price(item.total()),
                })
                .collect(),
            totals: TotalsView::from(&placed.totals),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub nav: NavView,
    pub order: OrderView,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(flatten)]
    pub details: ShippingDetails,
    pub payment_method: Option<String>,
}

/// Display the checkout form with a cart summary.
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

    Ok(CheckoutTemplate {
        nav: NavView::load(&session, Some(&user)).await,
        cart: CartView::from(&priced),
        payment_methods: PaymentOptionView::all(PaymentMethod::default()),
        details: ShippingDetails::default(),
        max_phone_length: MAX_PHONE_LENGTH,
        error: None,
    })
}

/// Place the order, clear the cart and show the confirmation.
///
/// An empty cart redirects back to `/cart`. Details that cannot be stored
/// re-render the form with a 400.
///
/// # Errors
///
/// Returns an error if the order cannot be written.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let (payment_method, fell_back) = PaymentMethod::from_form(form.payment_method.as_deref());
    if fell_back {
        tracing::warn!(
            submitted = ?form.payment_method,
            "Unknown payment method; using cash on delivery"
        );
    }

    let placed = match CheckoutService::new(state.pool())
        .place_order(user.id, &cart, &form.details, payment_method)
        .await
    {
        Ok(placed) => placed,
        Err(CheckoutError::EmptyCart) => return Ok(Redirect::to("/cart").into_response()),
        Err(CheckoutError::InvalidDetails(e)) => {
            let priced = resolve_cart(state.pool(), &cart).await?;
            let page = CheckoutTemplate {
                nav: NavView::load(&session, Some(&user)).await,
                cart: CartView::from(&priced),
                payment_methods: PaymentOptionView::all(payment_method),
                details: form.details,
                max_phone_length: MAX_PHONE_LENGTH,
                error: Some(capitalize(&e.to_string())),
            };
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(ConfirmationTemplate {
        nav: NavView::load(&session, Some(&user)).await,
        order: OrderView::from(&placed),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use nepal_clothing_core::{CustomerId, OrderId, OrderItemId, ProductId};

    use super::*;
    use crate::models::{Order, OrderItem};

    #[tokio::test]
    async fn test_checkout_form_deserializes_flat_fields() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::{Request, header::CONTENT_TYPE};

        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "first_name=Sita&last_name=Sharma&address=Thamel&city=Kathmandu\
                 &state=Bagmati&zip_code=44600&phone=980&payment_method=esewa",
            ))
            .unwrap();

        let Form(form) = Form::<CheckoutForm>::from_request(request, &()).await.unwrap();

        assert_eq!(form.details.first_name, "Sita");
        assert_eq!(form.details.zip, "44600");
        assert_eq!(form.details.notes, "");
        assert_eq!(form.payment_method.as_deref(), Some("esewa"));
    }

    #[test]
    fn test_checkout_form_rerenders_submitted_details_with_error() {
        use crate::routes::cart::CartLineView;

        let page = CheckoutTemplate {
            nav: NavView {
                username: Some("sita".to_owned()),
                cart_items: 1,
            },
            cart: CartView {
                lines: vec![CartLineView {
                    product_id: 4,
                    name: "Dhaka Topi".to_owned(),
                    url: "/products/4/dhaka-topi".to_owned(),
                    quantity: 1,
                    unit_price: "Rs. 850.00".to_owned(),
                    total: "Rs. 850.00".to_owned(),
                }],
                totals: TotalsView::from(&nepal_clothing_core::OrderTotals::from_lines([(
                    Decimal::new(850, 0),
                    1,
                )])),
            },
            payment_methods: PaymentOptionView::all(PaymentMethod::Khalti),
            details: ShippingDetails {
                first_name: "Sita".to_owned(),
                phone: "+977-980-000-0000 ext 12".to_owned(),
                ..ShippingDetails::default()
            },
            max_phone_length: MAX_PHONE_LENGTH,
            error: Some("Phone number must be at most 20 characters".to_owned()),
        };

        let html = page.render().unwrap();
        assert!(html.contains("Phone number must be at most 20 characters"));
        assert!(html.contains(r#"value="Sita""#));
        assert!(html.contains(r#"value="+977-980-000-0000 ext 12""#));
        assert!(html.contains(r#"maxlength="20""#));
        assert!(html.contains(r#"value="khalti" checked"#));
    }

    #[test]
    fn test_payment_options_mark_default() {
        let options = PaymentOptionView::all(PaymentMethod::default());
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].code, "cod");
        assert!(options[0].selected);
        assert!(options.iter().skip(1).all(|o| !o.selected));
    }

    #[test]
    fn test_order_view() {
        let order = Order {
            id: OrderId::new(17),
            customer_id: CustomerId::new(3),
            paid: true,
            shipping_address: "Sita Sharma\nThamel\nKathmandu, Bagmati 44600".to_owned(),
            shipping_phone: "980".to_owned(),
            notes: String::new(),
            payment_method: "khalti".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let items = vec![OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(17),
            product_id: ProductId::new(4),
            product_name: "Dhaka Topi".to_owned(),
            price: Decimal::new(850, 0),
            quantity: 2,
        }];

        let view = OrderView::from(&PlacedOrder::new(order, items));

        assert_eq!(view.id, 17);
        assert_eq!(view.payment_method, "Khalti");
        assert_eq!(view.shipping_address.len(), 3);
        assert_eq!(view.lines[0].total, "Rs. 1700.00");
        assert_eq!(view.totals.tax, "Rs. 221.00");
        assert_eq!(view.totals.grand_total, "Rs. 2021.00");
    }
}
