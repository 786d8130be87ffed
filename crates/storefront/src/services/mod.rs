//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Username/password registration and login
//! - `cart` - Pricing the session cart against current products
//! - `catalog` - Cached category list
//! - `checkout` - Turning a cart into an order

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::{CartLine, PricedCart, resolve_cart};
pub use catalog::CatalogCache;
pub use checkout::{CheckoutError, CheckoutService};
