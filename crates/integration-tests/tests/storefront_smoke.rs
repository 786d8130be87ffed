//! HTTP smoke tests against a running storefront.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront running (cargo run -p nepal-clothing-storefront)
//!
//! Run with: cargo test -p nepal-clothing-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode, redirect};
use rust_decimal::Decimal;

use nepal_clothing_integration_tests::{connect, seed_category, storefront_base_url, unique_suffix};

const PASSWORD: &str = "himalaya-2026";

/// Client that keeps cookies and follows redirects.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Client that keeps cookies and reports redirects instead of following them.
fn no_redirect_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn register(client: &Client) -> String {
    let username = format!("smoke{}", unique_suffix());
    let resp = client
        .post(format!("{}/auth/register", storefront_base_url()))
        .form(&[
            ("username", username.as_str()),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success() || resp.status().is_redirection());
    username
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let base_url = storefront_base_url();
    let resp = browser().get(format!("{base_url}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = browser().get(format!("{base_url}/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_public_pages_render() {
    let base_url = storefront_base_url();
    let client = browser();

    for path in ["/", "/products", "/auth/login", "/auth/register"] {
        let resp = client.get(format!("{base_url}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        assert!(resp.headers().contains_key("x-request-id"), "GET {path}");
    }

    let resp = client
        .get(format!("{base_url}/products/category/no-such-category"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_protected_routes_redirect_to_login() {
    let base_url = storefront_base_url();
    let client = no_redirect_client();

    for (path, next) in [("/cart", "%2Fcart"), ("/checkout", "%2Fcheckout")] {
        let resp = client.get(format!("{base_url}{path}")).send().await.unwrap();
        assert!(resp.status().is_redirection(), "GET {path}");
        let location = resp.headers()["location"].to_str().unwrap();
        assert_eq!(location, format!("/auth/login?next={next}"));
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_about_us_requires_login() {
    let base_url = storefront_base_url();
    let client = no_redirect_client();

    let resp = client.get(format!("{base_url}/about-us")).send().await.unwrap();
    assert!(resp.status().is_redirection());
    let location = resp.headers()["location"].to_str().unwrap();
    assert_eq!(location, "/auth/login?next=%2Fabout-us");

    register(&client).await;
    let resp = client.get(format!("{base_url}/about-us")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_and_checkout_flow() {
    let pool = connect().await;
    let (_, products) = seed_category(&pool, &[(Decimal::new(85_000, 2), true)]).await;
    let product = &products[0];

    let base_url = storefront_base_url();
    let client = browser();
    register(&client).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/add/{}", product.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart = client.get(format!("{base_url}/cart")).send().await.unwrap();
    let body = cart.text().await.unwrap();
    assert!(body.contains(&product.name));
    assert!(body.contains("Rs. 1700.00"));

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[
            ("first_name", "Sita"),
            ("last_name", "Sharma"),
            ("email", "sita@example.com"),
            ("address", "Thamel Marg 12"),
            ("city", "Kathmandu"),
            ("state", "Bagmati"),
            ("zip", "44600"),
            ("phone", "9800000000"),
            ("payment_method", "khalti"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Thank you for your order"));
    // 1700.00 + 221.00 tax + 100.00 shipping
    assert!(body.contains("Rs. 2021.00"));

    let cart = client.get(format!("{base_url}/cart")).send().await.unwrap();
    let body = cart.text().await.unwrap();
    assert!(!body.contains(&product.name));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_failed_login_returns_unauthorized() {
    let base_url = storefront_base_url();
    let resp = browser()
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("username", format!("ghost{}", unique_suffix()).as_str()),
            ("password", "whatever-password"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
