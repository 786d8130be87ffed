//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod payment;
pub mod price;
pub mod shipping;
pub mod username;

pub use cart::{Cart, CartEntry};
pub use id::*;
pub use payment::{PaymentMethod, UnknownPaymentMethod};
pub use price::{CURRENCY_PREFIX, OrderTotals, SHIPPING_FLAT, TAX_RATE, format_price, line_total};
pub use shipping::{MAX_PHONE_LENGTH, ShippingDetails, ShippingError};
pub use username::{Username, UsernameError};
