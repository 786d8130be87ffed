//! Database integration tests for repositories and services.
//!
//! These tests require:
//! - A running `PostgreSQL` database (`DATABASE_URL`)
//! - Migrations applied (`nc-cli migrate`)
//!
//! Run with: cargo test -p nepal-clothing-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;

use nepal_clothing_core::{Cart, PaymentMethod, ProductId, ShippingDetails, ShippingError};
use nepal_clothing_integration_tests::{connect, seed_category, unique_suffix};
use nepal_clothing_storefront::db::{
    CategoryRepository, CustomerContact, CustomerRepository, OrderRepository, ProductRepository,
};
use nepal_clothing_storefront::models::{NewOrder, NewOrderItem};
use nepal_clothing_storefront::services::{
    AuthError, AuthService, CatalogCache, CheckoutError, CheckoutService,
};

const PASSWORD: &str = "himalaya-2026";

fn shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: " Sita ".to_owned(),
        last_name: "Sharma".to_owned(),
        email: "sita@example.com".to_owned(),
        address: "Thamel Marg 12".to_owned(),
        city: "Kathmandu".to_owned(),
        state: "Bagmati".to_owned(),
        zip: "44600".to_owned(),
        phone: "9800000000".to_owned(),
        notes: "Leave at the gate".to_owned(),
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_listing_excludes_unavailable_products() {
    let pool = connect().await;
    let (category, products) =
        seed_category(&pool, &[(Decimal::new(85_000, 2), true), (Decimal::new(5_000, 2), false)]).await;

    let repo = ProductRepository::new(&pool);
    let listed = repo.list_available(Some(category.id), None).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, products[0].id);

    let hidden = &products[1];
    assert!(repo.get_available(hidden.id, &hidden.slug).await.unwrap().is_none());
    assert!(repo.get_available_by_id(hidden.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_product_detail_requires_matching_slug() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(120_000, 2), true)]).await;
    let product = &products[0];

    let repo = ProductRepository::new(&pool);
    let found = repo.get_available(product.id, &product.slug).await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(product.id));

    assert!(repo.get_available(product.id, "wrong-slug").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_category_lookup_by_slug() {
    let pool = connect().await;
    let (category, _) = seed_category(&pool, &[]).await;

    let repo = CategoryRepository::new(&pool);
    let found = repo.get_by_slug(&category.slug).await.unwrap().unwrap();
    assert_eq!(found.id, category.id);

    assert!(repo.get_by_slug("no-such-category-slug").await.unwrap().is_none());
    assert!(repo.list().await.unwrap().iter().any(|c| c.id == category.id));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_category_seeded_after_cache_warm_is_found() {
    let pool = connect().await;
    let cache = CatalogCache::new();
    cache.categories(&pool).await.unwrap();

    let (category, _) = seed_category(&pool, &[]).await;

    let found = cache.category_by_slug(&pool, &category.slug).await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(category.id));

    let listed = cache.categories(&pool).await.unwrap();
    assert!(listed.iter().any(|c| c.id == category.id));

    assert!(cache.category_by_slug(&pool, "no-such-category-slug").await.unwrap().is_none());
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_register_creates_customer_profile() {
    let pool = connect().await;
    let username = format!("sita{}", unique_suffix());

    let auth = AuthService::new(&pool);
    let user = auth.register(&username, PASSWORD, PASSWORD).await.unwrap();
    assert_eq!(user.username.as_str(), username);

    let customer = CustomerRepository::new(&pool)
        .get_or_create(user.id)
        .await
        .unwrap();
    assert_eq!(customer.user_id, user.id);
    assert_eq!(customer.phone, "");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_register_duplicate_username() {
    let pool = connect().await;
    let username = format!("ram{}", unique_suffix());

    let auth = AuthService::new(&pool);
    auth.register(&username, PASSWORD, PASSWORD).await.unwrap();

    let err = auth.register(&username, PASSWORD, PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_login_checks_password() {
    let pool = connect().await;
    let username = format!("hari{}", unique_suffix());

    let auth = AuthService::new(&pool);
    let registered = auth.register(&username, PASSWORD, PASSWORD).await.unwrap();

    let user = auth.login(&username, PASSWORD).await.unwrap();
    assert_eq!(user.id, registered.id);

    let err = auth.login(&username, "not-the-password").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = auth.login("nobody-by-this-name", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_creates_order_with_items() {
    let pool = connect().await;
    let (_, products) =
        seed_category(&pool, &[(Decimal::new(125_050, 2), true), (Decimal::new(85_000, 2), true)]).await;

    let user = AuthService::new(&pool)
        .register(&format!("gita{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add(products[0].id, &products[0].name, products[0].price);
    cart.add(products[0].id, &products[0].name, products[0].price);
    cart.add(products[1].id, &products[1].name, products[1].price);

    let placed = CheckoutService::new(&pool)
        .place_order(user.id, &cart, &shipping(), PaymentMethod::Esewa)
        .await
        .unwrap();

    // 2 × 1250.50 + 850.00 = 3351.00; tax 435.63; shipping 100.00
    assert_eq!(placed.totals.subtotal, Decimal::new(335_100, 2));
    assert_eq!(placed.totals.tax, Decimal::new(335_100, 2) * Decimal::new(13, 2));
    assert_eq!(
        placed.totals.grand_total,
        placed.totals.subtotal + placed.totals.tax + Decimal::new(100, 0)
    );
    assert!(placed.order.paid);
    assert_eq!(placed.order.payment_method(), PaymentMethod::Esewa);
    assert!(placed.order.shipping_address.starts_with("Sita Sharma\n"));

    let orders = OrderRepository::new(&pool);
    let stored = orders.get_by_id(placed.order.id).await.unwrap().unwrap();
    assert_eq!(stored.customer_id, placed.order.customer_id);

    let items = orders.get_items(placed.order.id).await.unwrap();
    assert_eq!(items.len(), 2);
    let first = items.iter().find(|i| i.product_id == products[0].id).unwrap();
    assert_eq!(first.quantity(), 2);
    assert_eq!(first.price, Decimal::new(125_050, 2));
    assert_eq!(first.product_name, products[0].name);

    let customer = CustomerRepository::new(&pool)
        .get_or_create(user.id)
        .await
        .unwrap();
    assert_eq!(customer.phone, "9800000000");
    assert!(customer.address.ends_with("Phone: 9800000000"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_uses_current_price() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(50_000, 2), true)]).await;
    let product = &products[0];

    let user = AuthService::new(&pool)
        .register(&format!("bina{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add(product.id, &product.name, Decimal::new(1, 0));

    let placed = CheckoutService::new(&pool)
        .place_order(user.id, &cart, &shipping(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(placed.items[0].price, Decimal::new(50_000, 2));
    assert_eq!(placed.totals.subtotal, Decimal::new(50_000, 2));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_rejects_empty_cart() {
    let pool = connect().await;
    let user = AuthService::new(&pool)
        .register(&format!("kiran{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let err = CheckoutService::new(&pool)
        .place_order(user.id, &Cart::new(), &shipping(), PaymentMethod::Khalti)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_rejects_overlong_phone_without_writing() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(85_000, 2), true)]).await;
    let user = AuthService::new(&pool)
        .register(&format!("anil{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add(products[0].id, &products[0].name, products[0].price);

    let mut details = shipping();
    details.phone = "+977-980-000-0000 ext 12".to_owned();

    let err = CheckoutService::new(&pool)
        .place_order(user.id, &cart, &details, PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::InvalidDetails(ShippingError::PhoneTooLong { max: 20 })
    ));

    let customer = CustomerRepository::new(&pool)
        .get_or_create(user.id)
        .await
        .unwrap();
    assert_eq!(customer.phone, "");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_with_huge_quantity_is_capped() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(100, 2), true)]).await;
    let product = &products[0];
    let user = AuthService::new(&pool)
        .register(&format!("deepa{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add(product.id, &product.name, product.price);
    cart.set_quantity(product.id, 3_000_000_000);

    let placed = CheckoutService::new(&pool)
        .place_order(user.id, &cart, &shipping(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(placed.items[0].quantity(), Cart::MAX_QUANTITY);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_failed_order_leaves_customer_profile_unchanged() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(85_000, 2), true)]).await;
    let user = AuthService::new(&pool)
        .register(&format!("suman{}", unique_suffix()), PASSWORD, PASSWORD)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add(products[0].id, &products[0].name, products[0].price);
    CheckoutService::new(&pool)
        .place_order(user.id, &cart, &shipping(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    let order = NewOrder {
        paid: true,
        shipping_address: "Somewhere else".to_owned(),
        shipping_phone: "9811111111".to_owned(),
        notes: String::new(),
        payment_method: PaymentMethod::CashOnDelivery,
    };
    let missing_product = NewOrderItem {
        product_id: ProductId::new(i32::MAX),
        price: Decimal::new(100, 0),
        quantity: 1,
    };

    let result = OrderRepository::new(&pool)
        .create_with_items(
            user.id,
            Some(CustomerContact {
                phone: "9811111111",
                address: "Somewhere else",
            }),
            &order,
            &[missing_product],
        )
        .await;
    assert!(result.is_err());

    let customer = CustomerRepository::new(&pool)
        .get_or_create(user.id)
        .await
        .unwrap();
    assert_eq!(customer.phone, "9800000000");
}
